use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use seer_domain::similarity;
use seer_storage::models::IndexHit;

use crate::{Result, VectorIndex, overlay::SimilarityMatch, population::Population};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
	/// Native grouped query keyed on the owner id.
	Grouped,
	/// One flat top-K query folded per owner client-side. An owner whose best item ranks
	/// outside the K window is missed.
	Flat,
}
impl Strategy {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"grouped" => Some(Self::Grouped),
			"flat" => Some(Self::Flat),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPlan {
	pub strategy: Strategy,
	pub group_size: u64,
	pub flat_k_multiplier: u64,
	pub flat_k_min: u64,
	pub max_owners: u64,
}
impl QueryPlan {
	pub fn from_config(cfg: &seer_config::Search) -> Self {
		Self {
			strategy: Strategy::parse(&cfg.strategy).unwrap_or(Strategy::Grouped),
			group_size: u64::from(cfg.group_size.max(1)),
			flat_k_multiplier: u64::from(cfg.flat_k_multiplier.max(1)),
			flat_k_min: u64::from(cfg.flat_k_min),
			max_owners: u64::from(cfg.max_owners.max(1)),
		}
	}

	/// Owner groups requested from the index. Never fewer than the population size, so
	/// every known owner can be represented.
	pub fn owner_limit(&self, population: Option<&Population>) -> u64 {
		population.map(|population| population.len() as u64).unwrap_or(0).max(self.max_owners)
	}

	pub fn flat_k(&self, owner_limit: u64) -> u64 {
		owner_limit.saturating_mul(self.flat_k_multiplier).max(self.flat_k_min).max(1)
	}
}

/// Grouped top-1 similarity search: for every owner, the single item closest to the query.
pub struct QueryEngine {
	index: Arc<dyn VectorIndex>,
	plan: QueryPlan,
}
impl QueryEngine {
	pub fn new(index: Arc<dyn VectorIndex>, plan: QueryPlan) -> Self {
		Self { index, plan }
	}

	pub fn plan(&self) -> &QueryPlan {
		&self.plan
	}

	pub fn index(&self) -> &Arc<dyn VectorIndex> {
		&self.index
	}

	/// Returns one match per owner ordered by score descending, then item insertion order.
	///
	/// With a population, matches are only attributed to owners in it. The query vector is
	/// validated against the index dimension and L2-normalized before it is sent.
	pub async fn search(
		&self,
		vector: &[f32],
		population: Option<&Population>,
	) -> Result<Vec<SimilarityMatch>> {
		similarity::validate_query(vector, self.index.vector_dim())?;

		let Some(query) = similarity::l2_normalized(vector) else {
			return Err(seer_domain::VectorRejection::Zero.into());
		};

		if population.is_some_and(Population::is_empty) {
			return Ok(Vec::new());
		}

		let owner_limit = self.plan.owner_limit(population);
		let best = match self.plan.strategy {
			Strategy::Grouped => {
				let groups =
					self.index.query_groups(&query, owner_limit, self.plan.group_size).await?;

				best_per_owner(groups.into_iter().flatten())
			},
			Strategy::Flat => {
				let k = self.plan.flat_k(owner_limit);

				best_per_owner(self.index.query_flat(&query, k).await?)
			},
		};
		let mut matches: Vec<SimilarityMatch> = best
			.into_values()
			.filter(|hit| population.is_none_or(|population| population.contains(&hit.owner_id)))
			.map(|hit| SimilarityMatch {
				owner_id: hit.owner_id,
				item_id: hit.item_id,
				item_seq: hit.seq,
				score: hit.score,
				meta: hit.meta,
			})
			.collect();

		matches.sort_by(compare_matches);

		tracing::debug!(
			strategy = ?self.plan.strategy,
			owner_limit,
			match_count = matches.len(),
			"Grouped similarity search finished."
		);

		Ok(matches)
	}
}

/// Score descending, then earliest inserted item first.
pub fn compare_matches(a: &SimilarityMatch, b: &SimilarityMatch) -> Ordering {
	b.score.total_cmp(&a.score).then_with(|| a.item_seq.cmp(&b.item_seq))
}

fn best_per_owner(hits: impl IntoIterator<Item = IndexHit>) -> HashMap<String, IndexHit> {
	let mut best: HashMap<String, IndexHit> = HashMap::new();

	for hit in hits {
		match best.get(&hit.owner_id) {
			Some(current) if seer_storage::memory::compare_hits(current, &hit).is_le() => {},
			_ => {
				best.insert(hit.owner_id.clone(), hit);
			},
		}
	}

	best
}
