use std::{
	collections::HashMap,
	sync::{
		Arc, RwLock,
		atomic::{AtomicU64, Ordering},
	},
};

use uuid::Uuid;

use crate::{
	overlay::{OverlayCache, OverlaySnapshot, SimilarityMatch},
	sequencer::{RequestSequencer, SearchToken},
};

/// Search state for one client: its own sequencer and overlay, independent of every other
/// session.
#[derive(Debug)]
pub struct SearchSession {
	id: Uuid,
	sequencer: RequestSequencer,
	overlay: OverlayCache,
}
impl SearchSession {
	pub fn new() -> Self {
		Self::with_id(Uuid::new_v4())
	}

	pub fn with_id(id: Uuid) -> Self {
		Self { id, sequencer: RequestSequencer::new(), overlay: OverlayCache::new() }
	}

	pub fn id(&self) -> Uuid {
		self.id
	}

	/// Issues a fresh token for one search attempt. A retry is a new attempt and must call this
	/// again; only the latest token can still commit.
	pub fn begin_search(&self) -> SearchToken {
		self.sequencer.issue()
	}

	/// Commits `matches` if no newer search or reset has committed first.
	pub fn try_commit(&self, token: SearchToken, matches: Vec<SimilarityMatch>) -> bool {
		let admitted = self.overlay.replace(token.seq(), matches);

		if !admitted {
			tracing::debug!(
				session_id = %self.id,
				token = token.seq(),
				generation = self.overlay.generation(),
				"Discarded stale search result."
			);
		}

		admitted
	}

	/// Empties the overlay under a fresh token, so every search issued before the reset
	/// loses its commit. Returns the generation now live.
	pub fn clear(&self) -> u64 {
		let token = self.sequencer.issue();

		self.overlay.replace(token.seq(), Vec::new());

		self.overlay.generation()
	}

	pub fn overlay(&self) -> Arc<OverlaySnapshot> {
		self.overlay.snapshot()
	}

	pub fn generation(&self) -> u64 {
		self.overlay.generation()
	}

	pub fn get(&self, owner_id: &str) -> Option<SimilarityMatch> {
		self.overlay.get(owner_id)
	}
}
impl Default for SearchSession {
	fn default() -> Self {
		Self::new()
	}
}

#[derive(Debug)]
struct RegistryEntry {
	session: Arc<SearchSession>,
	last_used: AtomicU64,
}

/// Open sessions, bounded by `capacity`. Creating a session at capacity evicts the least
/// recently used one.
#[derive(Debug)]
pub struct SessionRegistry {
	capacity: usize,
	clock: AtomicU64,
	sessions: RwLock<HashMap<Uuid, RegistryEntry>>,
}
impl SessionRegistry {
	pub fn new(capacity: usize) -> Self {
		Self { capacity: capacity.max(1), clock: AtomicU64::new(0), sessions: RwLock::default() }
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn create(&self) -> Arc<SearchSession> {
		let session = Arc::new(SearchSession::new());
		let mut sessions = self.sessions.write().unwrap_or_else(|err| err.into_inner());

		while sessions.len() >= self.capacity {
			let Some(oldest) = sessions
				.iter()
				.min_by_key(|(_, entry)| entry.last_used.load(Ordering::Relaxed))
				.map(|(id, _)| *id)
			else {
				break;
			};

			sessions.remove(&oldest);

			tracing::debug!(session_id = %oldest, "Evicted least recently used session.");
		}

		sessions.insert(
			session.id(),
			RegistryEntry { session: session.clone(), last_used: AtomicU64::new(self.tick()) },
		);

		session
	}

	/// Looks up a session and marks it as used.
	pub fn get(&self, id: Uuid) -> Option<Arc<SearchSession>> {
		let sessions = self.sessions.read().unwrap_or_else(|err| err.into_inner());
		let entry = sessions.get(&id)?;

		entry.last_used.store(self.tick(), Ordering::Relaxed);

		Some(entry.session.clone())
	}

	/// In-flight searches holding the session still finish; their commits go nowhere.
	pub fn remove(&self, id: Uuid) -> bool {
		self.sessions.write().unwrap_or_else(|err| err.into_inner()).remove(&id).is_some()
	}

	pub fn len(&self) -> usize {
		self.sessions.read().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn tick(&self) -> u64 {
		self.clock.fetch_add(1, Ordering::Relaxed) + 1
	}
}
