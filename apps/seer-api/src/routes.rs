use axum::{
	Json, Router,
	body::Bytes,
	extract::{DefaultBodyLimit, Path, Request, State, rejection::BytesRejection},
	http::{HeaderMap, StatusCode, header::AUTHORIZATION},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use seer_service::{
	Error as ServiceError, Predicates, RebuildReport, SearchOutcome, SortKey, ViewOutcome,
};

#[derive(Debug, Serialize)]
pub struct SessionCreated {
	pub session_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewRequest {
	#[serde(flatten)]
	pub predicates: Predicates,
	#[serde(default)]
	pub sort: SortKey,
}

#[derive(Debug, Serialize)]
pub struct OverlayCleared {
	pub generation: u64,
}

#[derive(Debug, Serialize)]
pub struct PopulationRefreshed {
	pub owner_count: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let message = err.to_string();

		match err {
			ServiceError::DimensionMismatch { .. } =>
				json_error(StatusCode::BAD_REQUEST, "dimension_mismatch", message, None),
			ServiceError::InvalidQueryVector { .. } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_query_vector", message, None),
			ServiceError::InvalidRequest { .. } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			ServiceError::NotFound { .. } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			ServiceError::EmbeddingUnavailable { .. } => {
				tracing::warn!(error = %message, "Embedding provider failed.");

				json_error(StatusCode::BAD_GATEWAY, "embedding_unavailable", message, None)
			},
			ServiceError::IndexUnavailable { .. } => {
				tracing::warn!(error = %message, "Vector index failed.");

				json_error(StatusCode::SERVICE_UNAVAILABLE, "index_unavailable", message, None)
			},
			ServiceError::Storage { .. } => {
				tracing::error!(error = %message, "Attribute store failed.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message, None)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	let image_limit = state.service.cfg.search.max_image_bytes;

	Router::new()
		.route("/v1/sessions", post(create_session))
		.route("/v1/sessions/{id}", delete(close_session))
		.route("/v1/sessions/{id}/search", post(search).layer(DefaultBodyLimit::max(image_limit)))
		.route("/v1/sessions/{id}/view", post(view))
		.route("/v1/sessions/{id}/overlay", delete(clear_overlay))
		.route("/v1/population/refresh", post(refresh_population))
		.layer(middleware::from_fn_with_state(state.clone(), require_api_token))
		.route("/health", get(health))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/rebuild_index", post(rebuild_index))
		.layer(middleware::from_fn_with_state(state.clone(), require_admin_token))
		.with_state(state)
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn create_session(State(state): State<AppState>) -> Json<SessionCreated> {
	Json(SessionCreated { session_id: state.service.create_session() })
}

async fn close_session(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
	state.service.close_session(id)?;

	Ok(StatusCode::NO_CONTENT)
}

async fn search(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	image: Result<Bytes, BytesRejection>,
) -> Result<Json<SearchOutcome>, ApiError> {
	let image = image.map_err(body_rejection)?;
	let session = state.service.session(id)?;
	let outcome = state.service.run_similarity_search(&session, &image).await?;

	Ok(Json(outcome))
}

async fn view(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(payload): Json<ViewRequest>,
) -> Result<Json<ViewOutcome>, ApiError> {
	let session = state.service.session(id)?;

	Ok(Json(state.service.apply_filters(&session, &payload.predicates, payload.sort)))
}

async fn clear_overlay(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<OverlayCleared>, ApiError> {
	let session = state.service.session(id)?;

	Ok(Json(OverlayCleared { generation: state.service.clear_overlay(&session) }))
}

async fn refresh_population(
	State(state): State<AppState>,
) -> Result<Json<PopulationRefreshed>, ApiError> {
	let owner_count = state.service.refresh_population().await?;

	Ok(Json(PopulationRefreshed { owner_count }))
}

async fn rebuild_index(State(state): State<AppState>) -> Result<Json<RebuildReport>, ApiError> {
	let report = state.service.rebuild_index().await?;

	Ok(Json(report))
}

async fn require_api_token(
	State(state): State<AppState>,
	request: Request,
	next: Next,
) -> Result<Response, ApiError> {
	authorize(state.service.cfg.security.api_auth_token.as_deref(), request.headers())?;

	Ok(next.run(request).await)
}

async fn require_admin_token(
	State(state): State<AppState>,
	request: Request,
	next: Next,
) -> Result<Response, ApiError> {
	authorize(state.service.cfg.security.admin_auth_token.as_deref(), request.headers())?;

	Ok(next.run(request).await)
}

fn body_rejection(rejection: BytesRejection) -> ApiError {
	let status = rejection.status();
	let code =
		if status == StatusCode::PAYLOAD_TOO_LARGE { "payload_too_large" } else { "invalid_request" };

	json_error(status, code, rejection.body_text(), None)
}

fn authorize(expected: Option<&str>, headers: &HeaderMap) -> Result<(), ApiError> {
	let Some(expected) = expected else {
		return Ok(());
	};

	if read_bearer_token(headers).is_some_and(|token| token == expected) {
		return Ok(());
	}

	Err(json_error(
		StatusCode::UNAUTHORIZED,
		"unauthorized",
		"A valid bearer token is required.",
		Some(vec!["Authorization".to_string()]),
	))
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
	let token = value.strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(token) }
}
