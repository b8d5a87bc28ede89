use serde::{Deserialize, Serialize};

use seer_domain::similarity;

use crate::{Result, SeerService};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RebuildReport {
	pub rebuilt_count: u64,
	pub skipped_count: u64,
	pub owner_count: u64,
}

impl SeerService {
	/// Re-derives the vector index from the items stored in the attribute store, then
	/// refreshes the population. Items whose embedding cannot be indexed are skipped.
	pub async fn rebuild_index(&self) -> Result<RebuildReport> {
		let items = self.attributes.load_items().await?;
		let dim = self.engine.index().vector_dim();
		let total = items.len();
		let valid: Vec<_> = items
			.into_iter()
			.filter(|item| {
				let ok = similarity::validate_query(&item.embedding, dim).is_ok();

				if !ok {
					tracing::warn!(
						item_id = %item.item_id,
						owner_id = %item.owner_id,
						"Skipping item with an unusable embedding."
					);
				}

				ok
			})
			.collect();
		let rebuilt = self.engine.index().index_items(&valid).await?;
		let owner_count = self.refresh_population().await?;
		let report = RebuildReport {
			rebuilt_count: rebuilt as u64,
			skipped_count: (total - valid.len()) as u64,
			owner_count: owner_count as u64,
		};

		tracing::info!(
			rebuilt_count = report.rebuilt_count,
			skipped_count = report.skipped_count,
			"Vector index rebuilt."
		);

		Ok(report)
	}
}
