use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display metadata carried alongside an embedding. Never used for ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
	pub media_id: Option<String>,
	pub url: Option<String>,
	pub media_url: Option<String>,
	pub caption: Option<String>,
	pub width: Option<i32>,
	pub height: Option<i32>,
}

/// A stored unit of visual content. `seq` is the insertion ordinal used to break score ties.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
	pub item_id: Uuid,
	pub owner_id: String,
	pub seq: u64,
	pub embedding: Vec<f32>,
	pub meta: ItemMeta,
}
