use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
	Error, Result, SeerService,
	overlay::SimilarityMatch,
	sequencer::SearchToken,
	session::SearchSession,
	view::{self, Predicates, RankedOwner, SortKey},
};

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
	/// Generation live after this search. Equals the search's own token when admitted.
	pub generation: u64,
	/// False when a newer search or a reset committed first; the matches were dropped.
	pub admitted: bool,
	/// Owners matched in total; `matches` and `owners` are cut to the result limit.
	pub total_found: usize,
	pub matches: Vec<SimilarityMatch>,
	pub owners: Vec<RankedOwner>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewOutcome {
	pub generation: u64,
	pub owners: Vec<RankedOwner>,
}

impl SeerService {
	pub fn create_session(&self) -> Uuid {
		self.sessions.create().id()
	}

	pub fn session(&self, id: Uuid) -> Result<Arc<SearchSession>> {
		self.sessions.get(id).ok_or_else(|| Error::NotFound { message: format!("session {id}") })
	}

	pub fn close_session(&self, id: Uuid) -> Result<()> {
		if !self.sessions.remove(id) {
			return Err(Error::NotFound { message: format!("session {id}") });
		}

		Ok(())
	}

	/// Embeds `image`, runs the grouped similarity search, and commits the result to the
	/// session's overlay unless a newer search or reset got there first.
	///
	/// The token is taken before any I/O, so commit order follows the order requests
	/// arrived in. On any error the overlay is left untouched.
	pub async fn run_similarity_search(
		&self,
		session: &SearchSession,
		image: &[u8],
	) -> Result<SearchOutcome> {
		if image.is_empty() {
			return Err(Error::InvalidRequest {
				message: "Image body must be non-empty.".to_string(),
			});
		}
		if image.len() > self.cfg.search.max_image_bytes {
			return Err(Error::InvalidRequest {
				message: format!(
					"Image body is {} bytes; the limit is {}.",
					image.len(),
					self.cfg.search.max_image_bytes
				),
			});
		}

		let token = session.begin_search();
		let vector =
			self.providers.embedding.embed_image(&self.cfg.providers.embedding, image).await?;

		self.search_and_commit(session, token, &vector).await
	}

	/// Same as [`Self::run_similarity_search`] for a caller that already has the vector.
	pub async fn run_vector_search(
		&self,
		session: &SearchSession,
		vector: &[f32],
	) -> Result<SearchOutcome> {
		let token = session.begin_search();

		self.search_and_commit(session, token, vector).await
	}

	/// Filters and sorts the current population against the session's committed overlay.
	pub fn apply_filters(
		&self,
		session: &SearchSession,
		predicates: &Predicates,
		sort: SortKey,
	) -> ViewOutcome {
		let population = self.population();
		let overlay = session.overlay();
		let owners = view::apply(&population, predicates, sort, &overlay, &self.precedence);

		ViewOutcome { generation: overlay.generation(), owners }
	}

	/// Drops the session's overlay and returns the generation that replaced it.
	pub fn clear_overlay(&self, session: &SearchSession) -> u64 {
		let generation = session.clear();

		tracing::debug!(session_id = %session.id(), generation, "Overlay cleared.");

		generation
	}

	async fn search_and_commit(
		&self,
		session: &SearchSession,
		token: SearchToken,
		vector: &[f32],
	) -> Result<SearchOutcome> {
		let population = self.population();
		let matches = self.engine.search(vector, Some(&*population)).await?;
		let total_found = matches.len();
		let limit = self.cfg.search.result_limit as usize;
		let top: Vec<SimilarityMatch> = matches.iter().take(limit).cloned().collect();
		let admitted = session.try_commit(token, matches);

		if !admitted {
			return Ok(SearchOutcome {
				generation: session.generation(),
				admitted,
				total_found: 0,
				matches: Vec::new(),
				owners: Vec::new(),
			});
		}

		let owners = top
			.iter()
			.filter_map(|matched| {
				let owner = population.get(&matched.owner_id)?;

				Some(RankedOwner {
					owner: owner.clone(),
					best_match: Some(matched.clone()),
					display_image: view::display_image(owner, Some(matched), &self.precedence),
				})
			})
			.collect();

		tracing::debug!(
			session_id = %session.id(),
			generation = token.seq(),
			total_found,
			"Search committed."
		);

		Ok(SearchOutcome { generation: token.seq(), admitted, total_found, matches: top, owners })
	}
}
