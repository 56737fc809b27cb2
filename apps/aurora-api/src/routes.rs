use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use aurora_service::{AskRequest, CacheStatus, Error, QaAnswer};

const SERVICE_NAME: &str = "aurora-qa";

#[derive(Debug, Serialize)]
struct ServiceInfo {
	service: &'static str,
	version: &'static str,
	status: &'static str,
}

#[derive(Debug, Serialize)]
struct Health {
	status: &'static str,
	service: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			Error::Source { .. } => {
				tracing::error!(error = %err, "Messages API request failed.");

				ApiError::new(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string())
			},
			Error::Embedding { .. } | Error::Retrieval { .. } | Error::Generation { .. } => {
				tracing::error!(error = %err, "Failed to answer question.");

				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", err.to_string())
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(root))
		.route("/api/v1/health", get(health))
		.route("/api/v1/ask", get(ask_query).post(ask_json))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/admin/v1/cache", get(cache_status))
		.route("/admin/v1/cache/invalidate", post(invalidate_cache))
		.with_state(state)
}

async fn root() -> Json<ServiceInfo> {
	Json(ServiceInfo { service: SERVICE_NAME, version: aurora_cli::VERSION, status: "running" })
}

async fn health() -> Json<Health> {
	Json(Health { status: "healthy", service: SERVICE_NAME })
}

async fn ask_query(
	State(state): State<AppState>,
	Query(payload): Query<AskRequest>,
) -> Result<Json<QaAnswer>, ApiError> {
	ask(state, payload).await
}

async fn ask_json(
	State(state): State<AppState>,
	Json(payload): Json<AskRequest>,
) -> Result<Json<QaAnswer>, ApiError> {
	ask(state, payload).await
}

async fn ask(state: AppState, payload: AskRequest) -> Result<Json<QaAnswer>, ApiError> {
	tracing::info!(question = %payload.question, "Received question.");

	let response = state.service.answer_question(&payload.question).await?;

	Ok(Json(response))
}

async fn cache_status(State(state): State<AppState>) -> Json<CacheStatus> {
	Json(state.service.cache_status())
}

async fn invalidate_cache(State(state): State<AppState>) -> StatusCode {
	state.service.invalidate_cache();

	StatusCode::NO_CONTENT
}
