use time::OffsetDateTime;
use uuid::Uuid;

use seer_domain::ItemMeta;

#[derive(Debug, sqlx::FromRow)]
pub struct OwnerRow {
	pub owner_id: String,
	pub username: String,
	pub location: Option<String>,
	pub arrival_locations: Vec<String>,
	pub price_hairstyle_bride: Option<f64>,
	pub price_hairstyle_bridesmaid: Option<f64>,
	pub price_makeup_bride: Option<f64>,
	pub price_makeup_bridesmaid: Option<f64>,
	pub price_hairstyle_makeup_combo: Option<f64>,
	pub min_price: Option<f64>,
	pub max_price: Option<f64>,
	pub updated_at: Option<OffsetDateTime>,
	pub sample_media_id: Option<String>,
	pub sample_url: Option<String>,
	pub sample_media_url: Option<String>,
	pub sample_caption: Option<String>,
	pub sample_width: Option<i32>,
	pub sample_height: Option<i32>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ItemRow {
	pub item_id: Uuid,
	pub seq: i64,
	pub owner_id: String,
	pub embedding_text: String,
	pub media_id: Option<String>,
	pub url: Option<String>,
	pub media_url: Option<String>,
	pub caption: Option<String>,
	pub width: Option<i32>,
	pub height: Option<i32>,
}

/// One candidate returned by a vector index query, scored against the query vector.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
	pub item_id: Uuid,
	pub owner_id: String,
	pub seq: u64,
	pub score: f32,
	pub meta: ItemMeta,
}
