use std::collections::HashMap;

use qdrant_client::{
	Payload,
	qdrant::{
		CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance, FieldType,
		PointStruct, Query, QueryPointGroupsBuilder, QueryPointsBuilder, ScoredPoint,
		UpsertPointsBuilder, Value, VectorParamsBuilder, point_id::PointIdOptions, value::Kind,
	},
};
use uuid::Uuid;

use seer_domain::{Item, ItemMeta, similarity};

use crate::{Error, Result, items::check_embedding, models::IndexHit};

pub const OWNER_ID_KEY: &str = "owner_id";
pub const SEQ_KEY: &str = "seq";

const UPSERT_BATCH: usize = 256;

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &seer_config::Index) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the collection with cosine distance and a keyword index on the owner key, which
	/// the grouped query needs.
	pub async fn ensure_collection(&self) -> Result<bool> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(false);
		}

		self.client
			.create_collection(
				CreateCollectionBuilder::new(self.collection.clone()).vectors_config(
					VectorParamsBuilder::new(u64::from(self.vector_dim), Distance::Cosine),
				),
			)
			.await?;
		self.client
			.create_field_index(
				CreateFieldIndexCollectionBuilder::new(
					self.collection.clone(),
					OWNER_ID_KEY,
					FieldType::Keyword,
				)
				.wait(true),
			)
			.await?;

		tracing::info!(collection = %self.collection, "Created Qdrant collection.");

		Ok(true)
	}

	/// Upserts items as unit vectors. Fails before writing anything when an embedding is
	/// unusable.
	pub async fn upsert_items(&self, items: &[Item]) -> Result<usize> {
		for item in items {
			check_embedding(&item.embedding, self.vector_dim as usize)?;
		}

		for batch in items.chunks(UPSERT_BATCH) {
			let points: Vec<PointStruct> = batch.iter().map(item_point).collect();

			self.client
				.upsert_points(UpsertPointsBuilder::new(self.collection.clone(), points).wait(true))
				.await?;
		}

		Ok(items.len())
	}

	pub async fn query_flat(&self, vector: &[f32], limit: u64) -> Result<Vec<IndexHit>> {
		self.check_dim(vector)?;

		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector.to_vec()))
			.with_payload(true)
			.limit(limit);
		let response = self.client.query(search).await?;

		Ok(response.result.iter().filter_map(scored_point_hit).collect())
	}

	/// Native grouped query: the best `group_size` hits for each of up to `limit` owners.
	pub async fn query_groups(
		&self,
		vector: &[f32],
		limit: u64,
		group_size: u64,
	) -> Result<Vec<Vec<IndexHit>>> {
		self.check_dim(vector)?;

		let search = QueryPointGroupsBuilder::new(self.collection.clone(), OWNER_ID_KEY)
			.query(Query::new_nearest(vector.to_vec()))
			.with_payload(true)
			.group_size(group_size.max(1))
			.limit(limit);
		let response = self.client.query_groups(search).await?;
		let groups = response.result.map(|result| result.groups).unwrap_or_default();

		Ok(groups
			.iter()
			.map(|group| group.hits.iter().filter_map(scored_point_hit).collect::<Vec<_>>())
			.filter(|hits| !hits.is_empty())
			.collect())
	}

	fn check_dim(&self, vector: &[f32]) -> Result<()> {
		if vector.len() != self.vector_dim as usize {
			return Err(Error::DimensionMismatch {
				expected: self.vector_dim as usize,
				actual: vector.len(),
			});
		}

		Ok(())
	}
}

fn item_point(item: &Item) -> PointStruct {
	let mut payload = Payload::new();

	payload.insert(OWNER_ID_KEY, item.owner_id.clone());
	payload.insert(SEQ_KEY, serde_json::Value::from(item.seq));

	for (key, value) in [
		("media_id", &item.meta.media_id),
		("url", &item.meta.url),
		("media_url", &item.meta.media_url),
		("caption", &item.meta.caption),
	] {
		if let Some(value) = value {
			payload.insert(key, value.clone());
		}
	}
	for (key, value) in [("width", item.meta.width), ("height", item.meta.height)] {
		if let Some(value) = value {
			payload.insert(key, serde_json::Value::from(value));
		}
	}

	let vector =
		similarity::l2_normalized(&item.embedding).unwrap_or_else(|| item.embedding.clone());

	PointStruct::new(item.item_id.to_string(), vector, payload)
}

/// Points lacking a uuid id, owner, or seq are skipped: they were not written by this store.
fn scored_point_hit(point: &ScoredPoint) -> Option<IndexHit> {
	let item_id = match point.id.as_ref()?.point_id_options.as_ref()? {
		PointIdOptions::Uuid(id) => Uuid::parse_str(id).ok()?,
		PointIdOptions::Num(_) => return None,
	};
	let payload = &point.payload;

	Some(IndexHit {
		item_id,
		owner_id: payload_str(payload, OWNER_ID_KEY)?,
		seq: payload_u64(payload, SEQ_KEY)?,
		score: point.score,
		meta: ItemMeta {
			media_id: payload_str(payload, "media_id"),
			url: payload_str(payload, "url"),
			media_url: payload_str(payload, "media_url"),
			caption: payload_str(payload, "caption"),
			width: payload_u64(payload, "width").and_then(|value| i32::try_from(value).ok()),
			height: payload_u64(payload, "height").and_then(|value| i32::try_from(value).ok()),
		},
	})
}

fn payload_str(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	match &payload.get(key)?.kind {
		Some(Kind::StringValue(text)) => Some(text.clone()),
		_ => None,
	}
}

fn payload_u64(payload: &HashMap<String, Value>, key: &str) -> Option<u64> {
	match &payload.get(key)?.kind {
		Some(Kind::IntegerValue(value)) => u64::try_from(*value).ok(),
		Some(Kind::DoubleValue(value)) if value.fract() == 0.0 && *value >= 0.0 =>
			Some(*value as u64),
		_ => None,
	}
}
