use std::{
	cmp::Ordering,
	collections::{BTreeMap, BTreeSet},
	fmt::{Display, Formatter},
	hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::item::ItemMeta;

/// A place an owner works from or travels to. Compared case-insensitively after trimming; the
/// original spelling is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location {
	label: String,
	key: String,
}
impl Location {
	pub fn new(raw: &str) -> Option<Self> {
		let label = raw.trim();

		if label.is_empty() {
			return None;
		}

		Some(Self { label: label.to_string(), key: label.to_lowercase() })
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	/// Splits a legacy comma-separated location list, dropping blanks.
	pub fn parse_list(raw: &str) -> BTreeSet<Self> {
		raw.split(',').filter_map(Self::new).collect()
	}
}
impl PartialEq for Location {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}
impl Eq for Location {}
impl PartialOrd for Location {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}
impl Ord for Location {
	fn cmp(&self, other: &Self) -> Ordering {
		self.key.cmp(&other.key)
	}
}
impl Hash for Location {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.key.hash(state);
	}
}
impl Display for Location {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.label)
	}
}
impl TryFrom<String> for Location {
	type Error = String;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(&value).ok_or_else(|| "location must be non-empty".to_string())
	}
}
impl From<Location> for String {
	fn from(value: Location) -> Self {
		value.label
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceKind {
	HairstyleBride,
	HairstyleBridesmaid,
	MakeupBride,
	MakeupBridesmaid,
	HairstyleMakeupCombo,
	Min,
	Max,
}
impl PriceKind {
	pub const ALL: [Self; 7] = [
		Self::HairstyleBride,
		Self::HairstyleBridesmaid,
		Self::MakeupBride,
		Self::MakeupBridesmaid,
		Self::HairstyleMakeupCombo,
		Self::Min,
		Self::Max,
	];

	pub fn column(self) -> &'static str {
		match self {
			Self::HairstyleBride => "price_hairstyle_bride",
			Self::HairstyleBridesmaid => "price_hairstyle_bridesmaid",
			Self::MakeupBride => "price_makeup_bride",
			Self::MakeupBridesmaid => "price_makeup_bridesmaid",
			Self::HairstyleMakeupCombo => "price_hairstyle_makeup_combo",
			Self::Min => "min_price",
			Self::Max => "max_price",
		}
	}
}

/// A member of the ranked population, read-only from the search core's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
	pub owner_id: String,
	pub username: String,
	pub location: Option<Location>,
	#[serde(default)]
	pub arrival_locations: BTreeSet<Location>,
	#[serde(default)]
	pub prices: BTreeMap<PriceKind, f64>,
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
	#[serde(default)]
	pub sample_image: Option<ItemMeta>,
}
impl Owner {
	pub fn new(owner_id: impl Into<String>) -> Self {
		let owner_id = owner_id.into();

		Self {
			username: owner_id.clone(),
			owner_id,
			location: None,
			arrival_locations: BTreeSet::new(),
			prices: BTreeMap::new(),
			updated_at: None,
			sample_image: None,
		}
	}

	/// Zero, negative, and non-finite prices mean "not offered", never "free".
	pub fn valid_prices(&self) -> impl Iterator<Item = f64> + '_ {
		self.prices.values().copied().filter(|price| price.is_finite() && *price > 0.0)
	}

	pub fn min_valid_price(&self) -> Option<f64> {
		self.valid_prices().reduce(f64::min)
	}

	pub fn max_valid_price(&self) -> Option<f64> {
		self.valid_prices().reduce(f64::max)
	}

	/// The primary location plus every arrival location.
	pub fn eligible_locations(&self) -> impl Iterator<Item = &Location> {
		self.location.iter().chain(self.arrival_locations.iter())
	}

	pub fn serves_any(&self, selected: &BTreeSet<Location>) -> bool {
		self.eligible_locations().any(|location| selected.contains(location))
	}
}
