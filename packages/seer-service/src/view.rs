use std::{cmp::Ordering, collections::BTreeSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use seer_domain::{ImagePrecedence, Location, Owner};

use crate::{
	engine,
	overlay::{OverlaySnapshot, SimilarityMatch},
	population::Population,
};

/// Conjunctive attribute filters. Absent fields are inactive.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Predicates {
	#[serde(default)]
	pub locations: BTreeSet<Location>,
	/// The owner's cheapest valid price must not exceed this. Non-finite values disable it.
	#[serde(default)]
	pub max_price: Option<f64>,
	/// The owner's most expensive valid price must reach this. Non-finite values disable it.
	#[serde(default)]
	pub min_price: Option<f64>,
}
impl Predicates {
	pub fn is_active(&self) -> bool {
		!self.locations.is_empty() || self.max_price().is_some() || self.min_price().is_some()
	}

	pub fn matches(&self, owner: &Owner) -> bool {
		if !self.locations.is_empty() && !owner.serves_any(&self.locations) {
			return false;
		}
		if let Some(max_price) = self.max_price()
			&& !owner.min_valid_price().is_some_and(|price| price <= max_price)
		{
			return false;
		}
		if let Some(min_price) = self.min_price()
			&& !owner.max_valid_price().is_some_and(|price| price >= min_price)
		{
			return false;
		}

		true
	}

	fn max_price(&self) -> Option<f64> {
		self.max_price.filter(|price| price.is_finite())
	}

	fn min_price(&self) -> Option<f64> {
		self.min_price.filter(|price| price.is_finite())
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
	#[default]
	Similarity,
	PriceAscending,
	PriceDescending,
	Name,
	Recency,
}

/// One row of a filtered, sorted view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedOwner {
	#[serde(flatten)]
	pub owner: Owner,
	pub best_match: Option<SimilarityMatch>,
	pub display_image: Option<String>,
}

/// Filters the population and orders it by `sort`, consulting `overlay` for similarity.
///
/// Pure and synchronous: identical inputs always give identical output, and overlay
/// entries for owners outside `population` never appear.
pub fn apply(
	population: &Population,
	predicates: &Predicates,
	sort: SortKey,
	overlay: &OverlaySnapshot,
	precedence: &ImagePrecedence,
) -> Vec<RankedOwner> {
	let mut rows: Vec<(&Owner, Option<&SimilarityMatch>)> = population
		.owners()
		.iter()
		.filter(|owner| predicates.matches(owner))
		.map(|owner| (owner, overlay.get(&owner.owner_id)))
		.collect();

	// `sort_by` is stable, so ties keep population order.
	rows.sort_by(|(a, a_match), (b, b_match)| compare(sort, (*a, *a_match), (*b, *b_match)));

	rows.into_iter()
		.map(|(owner, best_match)| RankedOwner {
			display_image: display_image(owner, best_match, precedence),
			owner: owner.clone(),
			best_match: best_match.cloned(),
		})
		.collect()
}

/// The best match's image when it resolves, otherwise the owner's sample image.
pub fn display_image(
	owner: &Owner,
	best_match: Option<&SimilarityMatch>,
	precedence: &ImagePrecedence,
) -> Option<String> {
	best_match
		.and_then(|matched| precedence.resolve(&matched.meta))
		.or_else(|| owner.sample_image.as_ref().and_then(|meta| precedence.resolve(meta)))
}

fn compare(
	sort: SortKey,
	(a, a_match): (&Owner, Option<&SimilarityMatch>),
	(b, b_match): (&Owner, Option<&SimilarityMatch>),
) -> Ordering {
	match sort {
		SortKey::Similarity => match (a_match, b_match) {
			(Some(a), Some(b)) => engine::compare_matches(a, b),
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => Ordering::Equal,
		},
		SortKey::PriceAscending => {
			let price = |owner: &Owner| owner.min_valid_price().unwrap_or(f64::INFINITY);

			price(a).total_cmp(&price(b))
		},
		SortKey::PriceDescending => {
			let price = |owner: &Owner| owner.max_valid_price().unwrap_or(0.0);

			price(b).total_cmp(&price(a))
		},
		SortKey::Name => a
			.username
			.to_lowercase()
			.cmp(&b.username.to_lowercase())
			.then_with(|| a.username.cmp(&b.username)),
		SortKey::Recency => {
			let updated = |owner: &Owner| owner.updated_at.unwrap_or(OffsetDateTime::UNIX_EPOCH);

			updated(b).cmp(&updated(a))
		},
	}
}
