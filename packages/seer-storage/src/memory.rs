use std::{
	cmp::Ordering,
	collections::HashMap,
	sync::{RwLock, RwLockReadGuard},
};

use uuid::Uuid;

use seer_domain::{Item, ItemMeta, similarity};

use crate::{Error, Result, items::check_embedding, models::IndexHit};

/// Exact in-process vector index. Every query scans all items, so recall is perfect and the
/// grouped query needs no K window.
pub struct MemoryIndex {
	vector_dim: usize,
	items: RwLock<Vec<Item>>,
}
impl MemoryIndex {
	pub fn new(vector_dim: usize) -> Self {
		Self { vector_dim, items: RwLock::new(Vec::new()) }
	}

	pub fn vector_dim(&self) -> usize {
		self.vector_dim
	}

	pub fn len(&self) -> usize {
		self.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Appends an item and returns its insertion ordinal. Embeddings that cannot be scored are
	/// rejected.
	pub fn insert(
		&self,
		item_id: Uuid,
		owner_id: impl Into<String>,
		embedding: Vec<f32>,
		meta: ItemMeta,
	) -> Result<u64> {
		check_embedding(&embedding, self.vector_dim)?;

		let mut items = self.items.write().unwrap_or_else(|err| err.into_inner());
		let seq = items.last().map(|item| item.seq + 1).unwrap_or(0);

		items.push(Item { item_id, owner_id: owner_id.into(), seq, embedding, meta });

		Ok(seq)
	}

	/// Replaces the whole collection, keeping each item's stored `seq`. Nothing is replaced
	/// when any embedding is unusable.
	pub fn replace_all(&self, mut items: Vec<Item>) -> Result<usize> {
		for item in &items {
			check_embedding(&item.embedding, self.vector_dim)?;
		}

		items.sort_by_key(|item| item.seq);

		let count = items.len();

		*self.items.write().unwrap_or_else(|err| err.into_inner()) = items;

		Ok(count)
	}

	/// Flat top-`limit` by cosine similarity.
	pub fn query_flat(&self, vector: &[f32], limit: usize) -> Result<Vec<IndexHit>> {
		self.check_dim(vector)?;

		let mut hits = self.score_all(vector);

		hits.sort_by(compare_hits);
		hits.truncate(limit);

		Ok(hits)
	}

	/// Best `group_size` hits for each of the top `limit` owners.
	pub fn query_groups(
		&self,
		vector: &[f32],
		limit: usize,
		group_size: usize,
	) -> Result<Vec<Vec<IndexHit>>> {
		self.check_dim(vector)?;

		let mut by_owner: HashMap<String, Vec<IndexHit>> = HashMap::new();

		for hit in self.score_all(vector) {
			by_owner.entry(hit.owner_id.clone()).or_default().push(hit);
		}

		let mut groups: Vec<Vec<IndexHit>> = by_owner
			.into_values()
			.map(|mut hits| {
				hits.sort_by(compare_hits);
				hits.truncate(group_size.max(1));

				hits
			})
			.collect();

		groups.sort_by(|a, b| compare_hits(&a[0], &b[0]));
		groups.truncate(limit);

		Ok(groups)
	}

	fn score_all(&self, vector: &[f32]) -> Vec<IndexHit> {
		self.read()
			.iter()
			.map(|item| IndexHit {
				item_id: item.item_id,
				owner_id: item.owner_id.clone(),
				seq: item.seq,
				score: similarity::cosine_similarity(vector, &item.embedding),
				meta: item.meta.clone(),
			})
			.collect()
	}

	fn check_dim(&self, vector: &[f32]) -> Result<()> {
		if vector.len() != self.vector_dim {
			return Err(Error::DimensionMismatch {
				expected: self.vector_dim,
				actual: vector.len(),
			});
		}

		Ok(())
	}

	fn read(&self) -> RwLockReadGuard<'_, Vec<Item>> {
		self.items.read().unwrap_or_else(|err| err.into_inner())
	}
}

/// Score descending, then earliest insertion first.
pub fn compare_hits(a: &IndexHit, b: &IndexHit) -> Ordering {
	b.score.total_cmp(&a.score).then_with(|| a.seq.cmp(&b.seq))
}
