use std::{collections::HashMap, sync::Arc};

use arc_swap::{ArcSwap, Guard};
use serde::Serialize;
use uuid::Uuid;

use seer_domain::ItemMeta;

/// The best item an owner has for one query vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatch {
	pub owner_id: String,
	pub item_id: Uuid,
	/// Insertion ordinal of the item; breaks score ties.
	pub item_seq: u64,
	pub score: f32,
	pub meta: ItemMeta,
}

/// One committed generation of matches. Never mutated after it is published.
#[derive(Debug, Default)]
pub struct OverlaySnapshot {
	generation: u64,
	matches: HashMap<String, SimilarityMatch>,
}
impl OverlaySnapshot {
	fn new(generation: u64, matches: Vec<SimilarityMatch>) -> Self {
		let mut by_owner = HashMap::with_capacity(matches.len());

		for matched in matches {
			by_owner.entry(matched.owner_id.clone()).or_insert(matched);
		}

		Self { generation, matches: by_owner }
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn get(&self, owner_id: &str) -> Option<&SimilarityMatch> {
		self.matches.get(owner_id)
	}

	pub fn len(&self) -> usize {
		self.matches.len()
	}

	pub fn is_empty(&self) -> bool {
		self.matches.is_empty()
	}
}

/// Per-session overlay of similarity matches, published by atomic pointer swap.
#[derive(Debug, Default)]
pub struct OverlayCache {
	current: ArcSwap<OverlaySnapshot>,
}
impl OverlayCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn snapshot(&self) -> Arc<OverlaySnapshot> {
		self.current.load_full()
	}

	pub fn generation(&self) -> u64 {
		self.current.load().generation
	}

	pub fn get(&self, owner_id: &str) -> Option<SimilarityMatch> {
		self.current.load().get(owner_id).cloned()
	}

	/// Publishes `matches` as `generation` if it is strictly newer than the live snapshot.
	///
	/// Returns whether the commit was admitted. The first match listed for an owner wins.
	pub fn replace(&self, generation: u64, matches: Vec<SimilarityMatch>) -> bool {
		let next = Arc::new(OverlaySnapshot::new(generation, matches));
		let mut current = self.current.load_full();

		loop {
			if generation <= current.generation {
				return false;
			}

			let prev = self.current.compare_and_swap(&current, next.clone());

			if Arc::ptr_eq(&*prev, &current) {
				return true;
			}

			current = Guard::into_inner(prev);
		}
	}
}
