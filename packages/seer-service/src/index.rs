use seer_domain::Item;
use seer_storage::{memory::MemoryIndex, models::IndexHit, qdrant::QdrantStore};

use crate::{BoxFuture, Error, Result, VectorIndex};

impl VectorIndex for QdrantStore {
	fn vector_dim(&self) -> usize {
		self.vector_dim as usize
	}

	fn query_groups<'a>(
		&'a self,
		vector: &'a [f32],
		limit: u64,
		group_size: u64,
	) -> BoxFuture<'a, Result<Vec<Vec<IndexHit>>>> {
		Box::pin(async move {
			QdrantStore::query_groups(self, vector, limit, group_size).await.map_err(unavailable)
		})
	}

	fn query_flat<'a>(
		&'a self,
		vector: &'a [f32],
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<IndexHit>>> {
		Box::pin(
			async move { QdrantStore::query_flat(self, vector, limit).await.map_err(unavailable) },
		)
	}

	fn index_items<'a>(&'a self, items: &'a [Item]) -> BoxFuture<'a, Result<usize>> {
		Box::pin(async move {
			self.ensure_collection().await.map_err(unavailable)?;

			self.upsert_items(items).await.map_err(unavailable)
		})
	}
}

impl VectorIndex for MemoryIndex {
	fn vector_dim(&self) -> usize {
		MemoryIndex::vector_dim(self)
	}

	fn query_groups<'a>(
		&'a self,
		vector: &'a [f32],
		limit: u64,
		group_size: u64,
	) -> BoxFuture<'a, Result<Vec<Vec<IndexHit>>>> {
		let result = MemoryIndex::query_groups(self, vector, clamp(limit), clamp(group_size));

		Box::pin(async move { result.map_err(Error::from) })
	}

	fn query_flat<'a>(
		&'a self,
		vector: &'a [f32],
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<IndexHit>>> {
		let result = MemoryIndex::query_flat(self, vector, clamp(limit));

		Box::pin(async move { result.map_err(Error::from) })
	}

	fn index_items<'a>(&'a self, items: &'a [Item]) -> BoxFuture<'a, Result<usize>> {
		let result = self.replace_all(items.to_vec());

		Box::pin(async move { result.map_err(Error::from) })
	}
}

/// Rejected input keeps its caller-error mapping; every other failure means the index could
/// not answer.
fn unavailable(err: seer_storage::Error) -> Error {
	match err {
		seer_storage::Error::DimensionMismatch { .. } | seer_storage::Error::InvalidArgument(_) =>
			Error::from(err),
		other => Error::IndexUnavailable { message: other.to_string() },
	}
}

fn clamp(value: u64) -> usize {
	usize::try_from(value).unwrap_or(usize::MAX)
}
