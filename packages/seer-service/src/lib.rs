pub mod admin;
pub mod engine;
pub mod index;
pub mod overlay;
pub mod population;
pub mod search;
pub mod sequencer;
pub mod session;
pub mod view;

mod error;

pub use admin::RebuildReport;
pub use engine::{QueryEngine, QueryPlan, Strategy};
pub use error::{Error, Result};
pub use overlay::{OverlayCache, OverlaySnapshot, SimilarityMatch};
pub use population::Population;
pub use search::{SearchOutcome, ViewOutcome};
pub use sequencer::{RequestSequencer, SearchToken};
pub use session::{SearchSession, SessionRegistry};
pub use view::{Predicates, RankedOwner, SortKey};

use std::{future::Future, pin::Pin, sync::Arc};

use arc_swap::ArcSwap;

use seer_config::{Config, EmbeddingProviderConfig};
use seer_domain::{ImagePrecedence, Item, Owner};
use seer_providers::embedding;
use seer_storage::{db::Db, items, models::IndexHit, owners};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed_image<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		image: &'a [u8],
	) -> BoxFuture<'a, Result<Vec<f32>>>;
}

/// Nearest-neighbor queries over stored item embeddings.
pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn vector_dim(&self) -> usize;

	/// Up to `limit` owners, each with its best `group_size` hits.
	fn query_groups<'a>(
		&'a self,
		vector: &'a [f32],
		limit: u64,
		group_size: u64,
	) -> BoxFuture<'a, Result<Vec<Vec<IndexHit>>>>;

	fn query_flat<'a>(
		&'a self,
		vector: &'a [f32],
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<IndexHit>>>;

	/// Writes `items` into the index, creating it first when needed.
	fn index_items<'a>(&'a self, items: &'a [Item]) -> BoxFuture<'a, Result<usize>>;
}

/// Read access to owners and their stored items.
pub trait AttributeStore
where
	Self: Send + Sync,
{
	fn load_owners(&self) -> BoxFuture<'_, Result<Vec<Owner>>>;

	fn load_items(&self) -> BoxFuture<'_, Result<Vec<Item>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

pub struct SeerService {
	pub cfg: Config,
	pub providers: Providers,
	pub attributes: Arc<dyn AttributeStore>,
	pub engine: QueryEngine,
	pub precedence: ImagePrecedence,
	pub sessions: SessionRegistry,
	population: ArcSwap<Population>,
}
impl SeerService {
	pub fn new(
		cfg: Config,
		attributes: Arc<dyn AttributeStore>,
		index: Arc<dyn VectorIndex>,
	) -> Self {
		Self::with_providers(cfg, attributes, index, Providers::default())
	}

	pub fn with_providers(
		cfg: Config,
		attributes: Arc<dyn AttributeStore>,
		index: Arc<dyn VectorIndex>,
		providers: Providers,
	) -> Self {
		let engine = QueryEngine::new(index, QueryPlan::from_config(&cfg.search));
		let precedence = ImagePrecedence::from_config(&cfg.display);
		let sessions = SessionRegistry::new(cfg.search.max_sessions);

		Self {
			cfg,
			providers,
			attributes,
			engine,
			precedence,
			sessions,
			population: ArcSwap::from_pointee(Population::default()),
		}
	}

	/// The population snapshot in effect right now.
	pub fn population(&self) -> Arc<Population> {
		self.population.load_full()
	}

	/// Reloads the population from the attribute store and publishes it atomically.
	pub async fn refresh_population(&self) -> Result<usize> {
		let owners = self.attributes.load_owners().await?;
		let population = Population::new(owners);
		let count = population.len();

		self.population.store(Arc::new(population));

		tracing::info!(owner_count = count, "Population refreshed.");

		Ok(count)
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed_image<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		image: &'a [u8],
	) -> BoxFuture<'a, Result<Vec<f32>>> {
		Box::pin(async move { Ok(embedding::embed_image(cfg, image).await?) })
	}
}

impl AttributeStore for Db {
	fn load_owners(&self) -> BoxFuture<'_, Result<Vec<Owner>>> {
		Box::pin(async move { Ok(owners::load_owners(&self.pool).await?) })
	}

	fn load_items(&self) -> BoxFuture<'_, Result<Vec<Item>>> {
		Box::pin(async move { Ok(items::load_items(&self.pool).await?) })
	}
}
