use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Sequence number of one logical search request. Larger tokens were issued later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SearchToken(u64);
impl SearchToken {
	pub fn seq(self) -> u64 {
		self.0
	}
}

/// Hands out strictly increasing tokens. Only a commit carrying a token newer than the
/// overlay's generation is admitted; see [`crate::overlay::OverlayCache::replace`].
#[derive(Debug, Default)]
pub struct RequestSequencer {
	last_issued: AtomicU64,
}
impl RequestSequencer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn issue(&self) -> SearchToken {
		SearchToken(self.last_issued.fetch_add(1, Ordering::SeqCst) + 1)
	}

	pub fn last_issued(&self) -> u64 {
		self.last_issued.load(Ordering::SeqCst)
	}
}
