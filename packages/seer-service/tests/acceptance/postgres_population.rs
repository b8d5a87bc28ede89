use std::sync::Arc;

use seer_domain::{Location, PriceKind};
use seer_service::{Predicates, Providers, SearchSession, SeerService, SortKey};
use seer_storage::{items, memory::MemoryIndex, owners};
use seer_testkit::fixtures::{self, axis, image_meta, owner, scored};

use super::{DIM, FixedEmbedding};

#[tokio::test]
#[ignore = "Requires external Postgres. Set SEER_PG_DSN to run."]
async fn population_loads_in_recency_order_with_sample_images() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping population_loads_in_recency_order; set SEER_PG_DSN to run.");

		return;
	};
	let db = super::connect(&test_db).await;

	for row in [
		owner("old").location("Haifa").price(PriceKind::MakeupBride, 250.0).updated_at(100).build(),
		owner("new").arrivals(&["Haifa", "Eilat"]).updated_at(200).build(),
		owner("never").build(),
	] {
		owners::upsert_owner(&db.pool, &row).await.expect("Failed to insert owner.");
	}

	let sample = items::insert_item(&db.pool, "new", &scored(DIM as usize, 0.4), &image_meta("77"))
		.await
		.expect("Failed to insert item.");

	owners::set_sample_item(&db.pool, "new", sample.item_id).await.expect("Failed to set sample.");

	let service = SeerService::with_providers(
		fixtures::test_config(DIM),
		db.clone(),
		Arc::new(MemoryIndex::new(DIM as usize)),
		Providers::new(Arc::new(FixedEmbedding { vector: axis(DIM as usize, 0) })),
	);

	assert_eq!(service.refresh_population().await.expect("Refresh failed."), 3);

	let population = service.population();
	let order: Vec<&str> = population.owners().iter().map(|o| o.owner_id.as_str()).collect();

	assert_eq!(order, vec!["new", "old", "never"]);

	let session = SearchSession::new();
	let haifa = Predicates {
		locations: [Location::new("haifa").expect("Location should parse.")].into(),
		..Default::default()
	};
	let view = service.apply_filters(&session, &haifa, SortKey::Similarity);

	assert_eq!(view.owners.len(), 2);
	assert_eq!(view.owners[0].display_image.as_deref(), Some("/api/images/77/proxy"));

	test_db.cleanup().await.expect("Failed to clean up test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SEER_PG_DSN to run."]
async fn stored_items_rebuild_into_the_memory_index() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping stored_items_rebuild_into_the_memory_index; set SEER_PG_DSN.");

		return;
	};
	let db = super::connect(&test_db).await;

	for id in ["a", "b"] {
		owners::upsert_owner(&db.pool, &owner(id).build()).await.expect("Failed to insert owner.");
	}

	let first = items::insert_item(&db.pool, "a", &scored(DIM as usize, 0.7), &image_meta("1"))
		.await
		.expect("Failed to insert item.");
	let second = items::insert_item(&db.pool, "b", &scored(DIM as usize, 0.9), &image_meta("2"))
		.await
		.expect("Failed to insert item.");

	assert!(second.seq > first.seq);

	let index = Arc::new(MemoryIndex::new(DIM as usize));
	let service = SeerService::with_providers(
		fixtures::test_config(DIM),
		db.clone(),
		index.clone(),
		Providers::new(Arc::new(FixedEmbedding { vector: axis(DIM as usize, 0) })),
	);
	let report = service.rebuild_index().await.expect("Rebuild failed.");

	assert_eq!(report.rebuilt_count, 2);
	assert_eq!(index.len(), 2);

	let outcome = service
		.run_similarity_search(&SearchSession::new(), b"image")
		.await
		.expect("Search failed.");
	let order: Vec<&str> = outcome.matches.iter().map(|m| m.owner_id.as_str()).collect();

	assert_eq!(order, vec!["b", "a"]);

	test_db.cleanup().await.expect("Failed to clean up test database.");
}
