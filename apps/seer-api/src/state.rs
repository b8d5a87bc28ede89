use std::sync::Arc;

use seer_config::Config;
use seer_service::{SeerService, VectorIndex};
use seer_storage::{db::Db, memory::MemoryIndex, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SeerService>,
}
impl AppState {
	/// Connects the attribute store, opens the configured vector index, and loads the first
	/// population. The memory backend has nothing persisted, so it is rebuilt from Postgres.
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(config.storage.index.vector_dim).await?;

		let in_memory = config.storage.index.backend == "memory";
		let index: Arc<dyn VectorIndex> = if in_memory {
			Arc::new(MemoryIndex::new(config.storage.index.vector_dim as usize))
		} else {
			let store = QdrantStore::new(&config.storage.index)?;

			store.ensure_collection().await?;

			Arc::new(store)
		};
		let service = SeerService::new(config, Arc::new(db), index);

		if in_memory {
			service.rebuild_index().await?;
		} else {
			service.refresh_population().await?;
		}

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: SeerService) -> Self {
		Self { service: Arc::new(service) }
	}
}
