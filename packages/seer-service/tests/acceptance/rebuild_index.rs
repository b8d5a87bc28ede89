use std::sync::Arc;

use seer_service::{Providers, SearchSession, SeerService};
use seer_storage::{items, owners, qdrant::QdrantStore};
use seer_testkit::fixtures::{self, axis, image_meta, owner, scored};

use super::{DIM, FixedEmbedding};

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set SEER_PG_DSN and SEER_QDRANT_URL to run."]
async fn rebuild_derives_qdrant_from_postgres() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping rebuild_derives_qdrant_from_postgres; set SEER_PG_DSN to run.");

		return;
	};
	let Some(qdrant_url) = seer_testkit::env_qdrant_url() else {
		eprintln!("Skipping rebuild_derives_qdrant_from_postgres; set SEER_QDRANT_URL to run.");

		return;
	};
	let db = super::connect(&test_db).await;
	let mut cfg = fixtures::test_config(DIM);

	cfg.storage.index.backend = "qdrant".to_string();
	cfg.storage.index.url = qdrant_url;
	cfg.storage.index.collection = test_db.collection_name("seer_acceptance");

	let store =
		Arc::new(QdrantStore::new(&cfg.storage.index).expect("Failed to build Qdrant client."));

	for (id, similarities) in [("a", vec![0.2, 0.85]), ("b", vec![0.9]), ("c", vec![])] {
		owners::upsert_owner(&db.pool, &owner(id).build()).await.expect("Failed to insert owner.");

		for (position, similarity) in similarities.into_iter().enumerate() {
			items::insert_item(
				&db.pool,
				id,
				&scored(DIM as usize, similarity),
				&image_meta(&format!("{id}{position}")),
			)
			.await
			.expect("Failed to insert item.");
		}
	}

	let service = SeerService::with_providers(
		cfg,
		db.clone(),
		store.clone(),
		Providers::new(Arc::new(FixedEmbedding { vector: axis(DIM as usize, 0) })),
	);
	let report = service.rebuild_index().await.expect("Rebuild failed.");

	assert_eq!(report.rebuilt_count, 3);
	assert_eq!(report.owner_count, 3);

	let session = SearchSession::new();
	let outcome =
		service.run_similarity_search(&session, b"image").await.expect("Search failed.");
	let order: Vec<&str> = outcome.matches.iter().map(|m| m.owner_id.as_str()).collect();

	assert_eq!(order, vec!["b", "a"]);
	assert_eq!(outcome.matches[1].meta.media_id.as_deref(), Some("a1"));
	assert!(session.get("c").is_none());

	test_db.cleanup().await.expect("Failed to clean up test database.");
}
