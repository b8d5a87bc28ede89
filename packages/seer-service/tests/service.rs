use std::{
	collections::HashMap,
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
};

use tokio::sync::Notify;

use seer_config::{Config, EmbeddingProviderConfig};
use seer_domain::{Item, ItemMeta, Owner, PriceKind};
use seer_service::{
	AttributeStore, BoxFuture, EmbeddingProvider, Error, Predicates, Providers, Result,
	SearchSession, SeerService, SortKey, VectorIndex,
};
use seer_storage::{memory::MemoryIndex, models::IndexHit};
use seer_testkit::fixtures::{self, axis, image_meta, owner, scored};

const DIM: usize = 4;

struct StaticAttributes {
	owners: Vec<Owner>,
	items: Vec<Item>,
}
impl AttributeStore for StaticAttributes {
	fn load_owners(&self) -> BoxFuture<'_, Result<Vec<Owner>>> {
		let owners = self.owners.clone();

		Box::pin(async move { Ok(owners) })
	}

	fn load_items(&self) -> BoxFuture<'_, Result<Vec<Item>>> {
		let items = self.items.clone();

		Box::pin(async move { Ok(items) })
	}
}

struct MapEmbedding {
	vectors: HashMap<Vec<u8>, Vec<f32>>,
	calls: AtomicUsize,
}
impl MapEmbedding {
	fn new(entries: &[(&str, Vec<f32>)]) -> Self {
		let vectors =
			entries.iter().map(|(key, vector)| (key.as_bytes().to_vec(), vector.clone())).collect();

		Self { vectors, calls: AtomicUsize::new(0) }
	}
}
impl EmbeddingProvider for MapEmbedding {
	fn embed_image<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		image: &'a [u8],
	) -> BoxFuture<'a, Result<Vec<f32>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let result = self.vectors.get(image).cloned().ok_or_else(|| Error::EmbeddingUnavailable {
			message: "embedding endpoint refused the image".to_string(),
		});

		Box::pin(async move { result })
	}
}

struct Gate {
	vector: Vec<f32>,
	entered: Notify,
	release: Notify,
}

/// Blocks each embedding until the test releases it, so completion order is controllable.
struct GatedEmbedding {
	gates: HashMap<Vec<u8>, Arc<Gate>>,
}
impl GatedEmbedding {
	fn new(entries: &[(&str, Vec<f32>)]) -> Self {
		let gates = entries
			.iter()
			.map(|(key, vector)| {
				let gate =
					Gate { vector: vector.clone(), entered: Notify::new(), release: Notify::new() };

				(key.as_bytes().to_vec(), Arc::new(gate))
			})
			.collect();

		Self { gates }
	}

	fn gate(&self, image: &str) -> Arc<Gate> {
		self.gates.get(image.as_bytes()).cloned().expect("Unknown gate.")
	}
}
impl EmbeddingProvider for GatedEmbedding {
	fn embed_image<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		image: &'a [u8],
	) -> BoxFuture<'a, Result<Vec<f32>>> {
		let gate = self.gates.get(image).cloned();

		Box::pin(async move {
			let Some(gate) = gate else {
				return Err(Error::EmbeddingUnavailable { message: "unknown image".to_string() });
			};

			gate.entered.notify_one();
			gate.release.notified().await;

			Ok(gate.vector.clone())
		})
	}
}

struct FlakyIndex {
	inner: MemoryIndex,
	down: AtomicBool,
}
impl FlakyIndex {
	fn unavailable<T: Send + 'static>() -> BoxFuture<'static, Result<T>> {
		Box::pin(async {
			Err(Error::IndexUnavailable { message: "connection refused".to_string() })
		})
	}
}
impl VectorIndex for FlakyIndex {
	fn vector_dim(&self) -> usize {
		self.inner.vector_dim()
	}

	fn query_groups<'a>(
		&'a self,
		vector: &'a [f32],
		limit: u64,
		group_size: u64,
	) -> BoxFuture<'a, Result<Vec<Vec<IndexHit>>>> {
		if self.down.load(Ordering::SeqCst) {
			return Self::unavailable();
		}

		VectorIndex::query_groups(&self.inner, vector, limit, group_size)
	}

	fn query_flat<'a>(
		&'a self,
		vector: &'a [f32],
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<IndexHit>>> {
		if self.down.load(Ordering::SeqCst) {
			return Self::unavailable();
		}

		VectorIndex::query_flat(&self.inner, vector, limit)
	}

	fn index_items<'a>(&'a self, items: &'a [Item]) -> BoxFuture<'a, Result<usize>> {
		VectorIndex::index_items(&self.inner, items)
	}
}

fn seeded_index(items: &[(&str, f32)]) -> MemoryIndex {
	let index = MemoryIndex::new(DIM);

	for (position, (owner_id, similarity)) in items.iter().enumerate() {
		index
			.insert(
				uuid::Uuid::new_v4(),
				*owner_id,
				scored(DIM, *similarity),
				image_meta(&format!("{owner_id}-{position}")),
			)
			.expect("Failed to seed index.");
	}

	index
}

async fn build(
	cfg: Config,
	owners: Vec<Owner>,
	index: Arc<dyn VectorIndex>,
	embedding: Arc<dyn EmbeddingProvider>,
) -> SeerService {
	let attributes = Arc::new(StaticAttributes { owners, items: Vec::new() });
	let service = SeerService::with_providers(cfg, attributes, index, Providers::new(embedding));

	service.refresh_population().await.expect("Failed to load population.");

	service
}

/// A: best 0.9, B: best 0.95, C: no items. Only A is priced at or below 100.
fn scenario_owners() -> Vec<Owner> {
	vec![
		owner("a").username("Aviva").price(PriceKind::HairstyleBride, 80.0).build(),
		owner("b").username("Bat").price(PriceKind::HairstyleBride, 300.0).build(),
		owner("c").username("Carmel").build(),
	]
}

async fn scenario_service() -> SeerService {
	let index = seeded_index(&[("a", 0.3), ("a", 0.9), ("b", 0.95)]);
	let embedding = MapEmbedding::new(&[("query", axis(DIM, 0))]);
	let cfg = fixtures::test_config(DIM as u32);

	build(cfg, scenario_owners(), Arc::new(index), Arc::new(embedding)).await
}

fn ids(owners: &[seer_service::RankedOwner]) -> Vec<&str> {
	owners.iter().map(|row| row.owner.owner_id.as_str()).collect()
}

#[tokio::test]
async fn search_then_filters_follow_the_overlay() {
	let service = scenario_service().await;
	let session = SearchSession::new();
	let outcome =
		service.run_similarity_search(&session, b"query").await.expect("Search failed.");

	assert!(outcome.admitted);
	assert_eq!(outcome.total_found, 2);
	assert_eq!(
		outcome.matches.iter().map(|m| m.owner_id.as_str()).collect::<Vec<_>>(),
		vec!["b", "a"]
	);

	let all = service.apply_filters(&session, &Predicates::default(), SortKey::Similarity);

	assert_eq!(all.generation, outcome.generation);
	assert_eq!(ids(&all.owners), vec!["b", "a", "c"]);
	assert!(all.owners[2].best_match.is_none());

	let cheap = Predicates { max_price: Some(100.0), ..Default::default() };
	let filtered = service.apply_filters(&session, &cheap, SortKey::Similarity);

	assert_eq!(ids(&filtered.owners), vec!["a"]);
}

#[tokio::test]
async fn match_score_is_the_owners_best_item() {
	let service = scenario_service().await;
	let session = SearchSession::new();

	service.run_similarity_search(&session, b"query").await.expect("Search failed.");

	let best = session.get("a").expect("Owner a should match.");

	assert!((best.score - 0.9).abs() < 1e-4);
	assert_eq!(best.meta.media_id.as_deref(), Some("a-1"));
	assert_eq!(session.overlay().len(), 2);
}

#[tokio::test]
async fn search_outcome_carries_display_records() {
	let service = scenario_service().await;
	let session = SearchSession::new();
	let outcome =
		service.run_similarity_search(&session, b"query").await.expect("Search failed.");

	assert_eq!(outcome.owners[0].owner.owner_id, "b");
	assert_eq!(outcome.owners[0].display_image.as_deref(), Some("/api/images/b-2/proxy"));
}

#[tokio::test]
async fn result_limit_cuts_the_response_but_not_the_overlay() {
	let mut cfg = fixtures::test_config(DIM as u32);

	cfg.search.result_limit = 1;

	let index = seeded_index(&[("a", 0.9), ("b", 0.95)]);
	let embedding = MapEmbedding::new(&[("query", axis(DIM, 0))]);
	let service = build(cfg, scenario_owners(), Arc::new(index), Arc::new(embedding)).await;
	let session = SearchSession::new();
	let outcome =
		service.run_similarity_search(&session, b"query").await.expect("Search failed.");

	assert_eq!(outcome.total_found, 2);
	assert_eq!(outcome.matches.len(), 1);
	assert_eq!(outcome.owners.len(), 1);
	assert_eq!(session.overlay().len(), 2);
}

#[tokio::test]
async fn owners_outside_the_population_are_not_attributed() {
	let index = seeded_index(&[("ghost", 0.99), ("a", 0.5)]);
	let embedding = MapEmbedding::new(&[("query", axis(DIM, 0))]);
	let service = build(
		fixtures::test_config(DIM as u32),
		vec![owner("a").build()],
		Arc::new(index),
		Arc::new(embedding),
	)
	.await;
	let session = SearchSession::new();
	let outcome =
		service.run_similarity_search(&session, b"query").await.expect("Search failed.");

	assert_eq!(outcome.matches.len(), 1);
	assert_eq!(outcome.matches[0].owner_id, "a");
	assert!(session.get("ghost").is_none());
}

#[tokio::test]
async fn empty_index_yields_an_admitted_empty_result() {
	let embedding = MapEmbedding::new(&[("query", axis(DIM, 0))]);
	let service = build(
		fixtures::test_config(DIM as u32),
		scenario_owners(),
		Arc::new(MemoryIndex::new(DIM)),
		Arc::new(embedding),
	)
	.await;
	let session = SearchSession::new();
	let outcome =
		service.run_similarity_search(&session, b"query").await.expect("Search failed.");

	assert!(outcome.admitted);
	assert!(outcome.matches.is_empty());

	let view = service.apply_filters(&session, &Predicates::default(), SortKey::Similarity);

	assert_eq!(ids(&view.owners), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn flat_strategy_can_miss_an_owner_outside_the_window() {
	let owners = vec![owner("a").build(), owner("b").build()];
	let items = [("a", 0.99), ("a", 0.98), ("a", 0.97), ("b", 0.5)];
	let mut flat = fixtures::test_config(DIM as u32);

	flat.search.strategy = "flat".to_string();
	flat.search.flat_k_min = 1;
	flat.search.flat_k_multiplier = 1;
	flat.search.max_owners = 1;

	let mut grouped = fixtures::test_config(DIM as u32);

	grouped.search.max_owners = 1;

	let flat_service = build(
		flat,
		owners.clone(),
		Arc::new(seeded_index(&items)),
		Arc::new(MapEmbedding::new(&[("query", axis(DIM, 0))])),
	)
	.await;
	let grouped_service = build(
		grouped,
		owners,
		Arc::new(seeded_index(&items)),
		Arc::new(MapEmbedding::new(&[("query", axis(DIM, 0))])),
	)
	.await;
	let flat_outcome = flat_service
		.run_similarity_search(&SearchSession::new(), b"query")
		.await
		.expect("Search failed.");
	let grouped_outcome = grouped_service
		.run_similarity_search(&SearchSession::new(), b"query")
		.await
		.expect("Search failed.");

	assert_eq!(flat_outcome.total_found, 1);
	assert_eq!(grouped_outcome.total_found, 2);
}

#[tokio::test]
async fn equal_scores_break_ties_by_insertion_order() {
	let index = seeded_index(&[("older", 0.8), ("newer", 0.8)]);
	let embedding = MapEmbedding::new(&[("query", axis(DIM, 0))]);
	let service = build(
		fixtures::test_config(DIM as u32),
		vec![owner("newer").build(), owner("older").build()],
		Arc::new(index),
		Arc::new(embedding),
	)
	.await;
	let session = SearchSession::new();
	let outcome =
		service.run_similarity_search(&session, b"query").await.expect("Search failed.");

	assert_eq!(outcome.matches[0].owner_id, "older");
	assert_eq!(outcome.matches[1].owner_id, "newer");
}

#[tokio::test]
async fn stale_search_completing_last_is_discarded() {
	let index = seeded_index(&[("a", 0.9), ("b", 0.95)]);
	let embedding = Arc::new(GatedEmbedding::new(&[
		("old", axis(DIM, 0)),
		("new", axis(DIM, 1)),
	]));
	let cfg = fixtures::test_config(DIM as u32);
	let service = Arc::new(build(cfg, scenario_owners(), Arc::new(index), embedding.clone()).await);
	let session = Arc::new(SearchSession::new());
	let old_task = {
		let (service, session) = (service.clone(), session.clone());

		tokio::spawn(async move { service.run_similarity_search(&session, b"old").await })
	};

	embedding.gate("old").entered.notified().await;

	let new_task = {
		let (service, session) = (service.clone(), session.clone());

		tokio::spawn(async move { service.run_similarity_search(&session, b"new").await })
	};

	embedding.gate("new").entered.notified().await;
	embedding.gate("new").release.notify_one();

	let newer = new_task.await.expect("Task panicked.").expect("Search failed.");

	embedding.gate("old").release.notify_one();

	let older = old_task.await.expect("Task panicked.").expect("Search failed.");

	assert!(newer.admitted);
	assert_eq!(newer.generation, 2);
	assert!(!older.admitted);
	assert_eq!(older.generation, 2);
	assert!(older.matches.is_empty());
	assert_eq!(session.generation(), 2);
}

#[tokio::test]
async fn clear_wins_against_an_in_flight_search() {
	let index = seeded_index(&[("a", 0.9), ("b", 0.95)]);
	let embedding = Arc::new(GatedEmbedding::new(&[("query", axis(DIM, 0))]));
	let cfg = fixtures::test_config(DIM as u32);
	let service = Arc::new(build(cfg, scenario_owners(), Arc::new(index), embedding.clone()).await);
	let session = Arc::new(SearchSession::new());
	let task = {
		let (service, session) = (service.clone(), session.clone());

		tokio::spawn(async move { service.run_similarity_search(&session, b"query").await })
	};

	embedding.gate("query").entered.notified().await;

	let cleared = service.clear_overlay(&session);

	embedding.gate("query").release.notify_one();

	let outcome = task.await.expect("Task panicked.").expect("Search failed.");

	assert!(!outcome.admitted);
	assert_eq!(session.generation(), cleared);
	assert!(session.overlay().is_empty());

	let view = service.apply_filters(&session, &Predicates::default(), SortKey::Similarity);

	assert!(view.owners.iter().all(|row| row.best_match.is_none()));
}

#[tokio::test]
async fn embedding_failure_keeps_the_previous_overlay() {
	let service = scenario_service().await;
	let session = SearchSession::new();
	let first =
		service.run_similarity_search(&session, b"query").await.expect("Search failed.");
	let err = service.run_similarity_search(&session, b"unknown").await;

	assert!(matches!(err, Err(Error::EmbeddingUnavailable { .. })));
	assert_eq!(session.generation(), first.generation);

	let view = service.apply_filters(&session, &Predicates::default(), SortKey::Similarity);

	assert_eq!(ids(&view.owners), vec!["b", "a", "c"]);
}

#[tokio::test]
async fn index_outage_keeps_the_previous_overlay() {
	let index = Arc::new(FlakyIndex {
		inner: seeded_index(&[("a", 0.9), ("b", 0.95)]),
		down: AtomicBool::new(false),
	});
	let embedding = MapEmbedding::new(&[("query", axis(DIM, 0))]);
	let cfg = fixtures::test_config(DIM as u32);
	let service = build(cfg, scenario_owners(), index.clone(), Arc::new(embedding)).await;
	let session = SearchSession::new();
	let first =
		service.run_similarity_search(&session, b"query").await.expect("Search failed.");

	index.down.store(true, Ordering::SeqCst);

	let err = service.run_similarity_search(&session, b"query").await;

	assert!(matches!(err, Err(Error::IndexUnavailable { .. })));
	assert_eq!(session.generation(), first.generation);
	assert_eq!(session.overlay().len(), 2);
}

#[tokio::test]
async fn malformed_query_vectors_are_rejected_without_mutation() {
	let service = scenario_service().await;
	let session = SearchSession::new();

	service.run_similarity_search(&session, b"query").await.expect("Search failed.");

	let generation = session.generation();
	let wrong_dim = service.run_vector_search(&session, &[1.0, 0.0]).await;
	let zero = service.run_vector_search(&session, &[0.0; DIM]).await;
	let nan = service.run_vector_search(&session, &[f32::NAN, 0.0, 0.0, 0.0]).await;

	assert!(matches!(wrong_dim, Err(Error::DimensionMismatch { expected: DIM, actual: 2 })));
	assert!(matches!(zero, Err(Error::InvalidQueryVector { .. })));
	assert!(matches!(nan, Err(Error::InvalidQueryVector { .. })));
	assert_eq!(session.generation(), generation);
	assert_eq!(session.overlay().len(), 2);
}

#[tokio::test]
async fn empty_and_oversized_images_are_caller_errors() {
	let mut cfg = fixtures::test_config(DIM as u32);

	cfg.search.max_image_bytes = 4;

	let embedding = Arc::new(MapEmbedding::new(&[]));
	let service =
		build(cfg, scenario_owners(), Arc::new(MemoryIndex::new(DIM)), embedding.clone()).await;
	let session = SearchSession::new();

	assert!(matches!(
		service.run_similarity_search(&session, b"").await,
		Err(Error::InvalidRequest { .. })
	));
	assert!(matches!(
		service.run_similarity_search(&session, b"too large").await,
		Err(Error::InvalidRequest { .. })
	));
	assert_eq!(embedding.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn price_ceiling_edges() {
	let service = scenario_service().await;
	let session = SearchSession::new();
	let zero = Predicates { max_price: Some(0.0), ..Default::default() };
	let unbounded = Predicates { max_price: Some(f64::INFINITY), ..Default::default() };

	assert!(service.apply_filters(&session, &zero, SortKey::Similarity).owners.is_empty());
	assert_eq!(
		ids(&service.apply_filters(&session, &unbounded, SortKey::Similarity).owners),
		vec!["a", "b", "c"]
	);
}

#[tokio::test]
async fn filters_are_idempotent() {
	let service = scenario_service().await;
	let session = SearchSession::new();

	service.run_similarity_search(&session, b"query").await.expect("Search failed.");

	for sort in [
		SortKey::Similarity,
		SortKey::PriceAscending,
		SortKey::PriceDescending,
		SortKey::Name,
		SortKey::Recency,
	] {
		let first = service.apply_filters(&session, &Predicates::default(), sort);
		let second = service.apply_filters(&session, &Predicates::default(), sort);

		assert_eq!(first.owners, second.owners);
	}
}

#[tokio::test]
async fn location_filter_uses_arrival_locations() {
	let owners = vec![
		owner("haifa").location("Haifa").build(),
		owner("traveler").location("Eilat").arrivals(&["Haifa", "Tel Aviv"]).build(),
		owner("south").location("Eilat").build(),
	];
	let service = build(
		fixtures::test_config(DIM as u32),
		owners,
		Arc::new(MemoryIndex::new(DIM)),
		Arc::new(MapEmbedding::new(&[])),
	)
	.await;
	let session = SearchSession::new();
	let predicates: Predicates =
		serde_json::from_value(serde_json::json!({ "locations": ["  haifa "] }))
			.expect("Predicates should parse.");
	let view = service.apply_filters(&session, &predicates, SortKey::Similarity);

	assert_eq!(ids(&view.owners), vec!["haifa", "traveler"]);
}

#[tokio::test]
async fn name_and_recency_sorts() {
	let owners = vec![
		owner("1").username("bella").updated_at(100).build(),
		owner("2").username("Adi").build(),
		owner("3").username("adi").updated_at(300).build(),
	];
	let service = build(
		fixtures::test_config(DIM as u32),
		owners,
		Arc::new(MemoryIndex::new(DIM)),
		Arc::new(MapEmbedding::new(&[])),
	)
	.await;
	let session = SearchSession::new();
	let by_name = service.apply_filters(&session, &Predicates::default(), SortKey::Name);
	let by_recency = service.apply_filters(&session, &Predicates::default(), SortKey::Recency);

	assert_eq!(ids(&by_name.owners), vec!["2", "3", "1"]);
	assert_eq!(ids(&by_recency.owners), vec!["3", "1", "2"]);
}

#[tokio::test]
async fn sessions_are_independent() {
	let service = scenario_service().await;
	let first = service.session(service.create_session()).expect("Session should exist.");
	let second = service.session(service.create_session()).expect("Session should exist.");

	service.run_similarity_search(&first, b"query").await.expect("Search failed.");

	assert_eq!(first.overlay().len(), 2);
	assert!(second.overlay().is_empty());

	service.close_session(first.id()).expect("Close failed.");

	assert!(matches!(service.session(first.id()), Err(Error::NotFound { .. })));
	assert!(matches!(service.close_session(first.id()), Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn rebuild_skips_unusable_embeddings() {
	let item = |owner_id: &str, seq: u64, embedding: Vec<f32>| Item {
		item_id: uuid::Uuid::new_v4(),
		owner_id: owner_id.to_string(),
		seq,
		embedding,
		meta: ItemMeta::default(),
	};
	let attributes = Arc::new(StaticAttributes {
		owners: scenario_owners(),
		items: vec![
			item("a", 1, scored(DIM, 0.9)),
			item("b", 2, scored(DIM, 0.95)),
			item("b", 3, vec![1.0, 0.0]),
			item("c", 4, vec![0.0; DIM]),
		],
	});
	let index = Arc::new(MemoryIndex::new(DIM));
	let service = SeerService::with_providers(
		fixtures::test_config(DIM as u32),
		attributes,
		index.clone(),
		Providers::new(Arc::new(MapEmbedding::new(&[("query", axis(DIM, 0))]))),
	);
	let report = service.rebuild_index().await.expect("Rebuild failed.");

	assert_eq!(report.rebuilt_count, 2);
	assert_eq!(report.skipped_count, 2);
	assert_eq!(report.owner_count, 3);
	assert_eq!(index.len(), 2);

	let outcome = service
		.run_similarity_search(&SearchSession::new(), b"query")
		.await
		.expect("Search failed.");

	assert_eq!(outcome.matches[0].owner_id, "b");
}

#[tokio::test]
async fn rebuild_scores_large_embeddings_by_direction_and_drops_non_finite_ones() {
	let item = |owner_id: &str, seq: u64, embedding: Vec<f32>| Item {
		item_id: uuid::Uuid::new_v4(),
		owner_id: owner_id.to_string(),
		seq,
		embedding,
		meta: ItemMeta::default(),
	};
	let attributes = Arc::new(StaticAttributes {
		owners: scenario_owners(),
		items: vec![
			item("a", 1, vec![1e20, 0.0, 0.0, 0.0]),
			item("b", 2, scored(DIM, 0.5)),
			item("c", 3, vec![f32::NAN, 0.0, 0.0, 0.0]),
			item("c", 4, vec![f32::MAX; DIM]),
		],
	});
	let index = Arc::new(MemoryIndex::new(DIM));
	let service = SeerService::with_providers(
		fixtures::test_config(DIM as u32),
		attributes,
		index.clone(),
		Providers::new(Arc::new(MapEmbedding::new(&[("query", axis(DIM, 0))]))),
	);
	let report = service.rebuild_index().await.expect("Rebuild failed.");

	assert_eq!(report.rebuilt_count, 2);
	assert_eq!(report.skipped_count, 2);

	let outcome = service
		.run_similarity_search(&SearchSession::new(), b"query")
		.await
		.expect("Search failed.");
	let order: Vec<&str> = outcome.matches.iter().map(|m| m.owner_id.as_str()).collect();

	assert_eq!(order, vec!["a", "b"]);
	assert!((outcome.matches[0].score - 1.0).abs() < 1e-6);
	assert!(outcome.matches.iter().all(|m| m.score.is_finite()));
}

#[test]
fn memory_index_refuses_non_finite_items() {
	let index = seeded_index(&[("a", 0.9), ("b", 0.95)]);
	let embedding = vec![f32::NAN, 0.0, 0.0, 0.0];
	let err = index.insert(uuid::Uuid::new_v4(), "c", embedding, image_meta("x"));

	assert!(err.is_err());
	assert_eq!(index.len(), 2);
}
