use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
	response::Response,
};
use serde_json::{Map, Value};
use tower::util::ServiceExt;

use aurora_api::{routes, state::AppState};
use aurora_config::{
	AnswerProviderConfig, Cache, Config, EmbeddingProviderConfig, Providers as ProviderConfigs,
	Retrieval, Service, Source,
};
use aurora_domain::{Record, ScoredRecord};
use aurora_service::{
	AnswerProvider, AuroraService, BoxFuture, EmbeddingProvider, Error, Providers, RecordSource,
	Result,
};

struct LengthEmbedding;
impl EmbeddingProvider for LengthEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			Ok(texts
				.iter()
				.map(|text| {
					let mut vector = vec![0.0; cfg.dimensions as usize];
					let slot = text.len() % vector.len();

					vector[slot] = 1.0;

					vector
				})
				.collect())
		})
	}
}

struct StaticSource {
	records: Result<Vec<Record>, String>,
}
impl RecordSource for StaticSource {
	fn fetch_all(&self, _: bool) -> BoxFuture<'_, Result<Vec<Record>>> {
		Box::pin(async move {
			self.records.clone().map_err(|message| Error::Source { message })
		})
	}
}

struct FirstRecordAnswer;
impl AnswerProvider for FirstRecordAnswer {
	fn generate<'a>(
		&'a self,
		_: &'a AnswerProviderConfig,
		_: &'a str,
		ranked: &'a [ScoredRecord],
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			Ok(ranked.first().map(|item| item.record.text.clone()).unwrap_or_default())
		})
	}
}

fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		source: Source {
			api_base: "http://127.0.0.1:1".to_string(),
			path: "/messages/".to_string(),
			page_size: 100,
			timeout_ms: 1_000,
			snapshot_ttl_secs: 0,
			user_agent: "Aurora-QA-Service/1.0".to_string(),
		},
		providers: ProviderConfigs {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				model: "test".to_string(),
				dimensions: 8,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			answer: AnswerProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				model: "test".to_string(),
				temperature: 0.1,
				max_tokens: 200,
				timeout_ms: 1_000,
				max_attempts: 1,
				json_mode: false,
				default_headers: Map::new(),
			},
		},
		retrieval: Retrieval::default(),
		cache: Cache::default(),
	}
}

fn test_state(records: Result<Vec<Record>, String>) -> AppState {
	let providers = Providers {
		embedding: Arc::new(LengthEmbedding),
		source: Arc::new(StaticSource { records }),
		answer: Arc::new(FirstRecordAnswer),
	};

	AppState::from_service(AuroraService::with_providers(test_config(), providers))
}

fn sample_records() -> Vec<Record> {
	vec![
		Record {
			id: "m-1".to_string(),
			author_id: "u-1".to_string(),
			author_name: "Layla Kawaguchi".to_string(),
			timestamp: "2024-11-14T20:03:44+00:00".to_string(),
			text: "Book two seats for the Vienna opera.".to_string(),
		},
		Record {
			id: "m-2".to_string(),
			author_id: "u-2".to_string(),
			author_name: "Hans Müller".to_string(),
			timestamp: "2024-11-15T09:12:00+00:00".to_string(),
			text: "Change my car service to Tuesday.".to_string(),
		},
	]
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
	let response: Response = app.oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = if body.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&body).expect("Failed to parse response.")
	};

	(status, json)
}

fn get(uri: &str) -> Request<Body> {
	Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request.")
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json")
		.body(Body::from(payload.to_string()))
		.expect("Failed to build request.")
}

#[tokio::test]
async fn health_reports_service_name() {
	let app = routes::router(test_state(Ok(Vec::new())));
	let (status, json) = call(app, get("/api/v1/health")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["status"], "healthy");
	assert_eq!(json["service"], "aurora-qa");
}

#[tokio::test]
async fn root_reports_version() {
	let app = routes::router(test_state(Ok(Vec::new())));
	let (status, json) = call(app, get("/")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["version"], aurora_cli::VERSION);
}

#[tokio::test]
async fn post_ask_returns_answer_and_sources() {
	let app = routes::router(test_state(Ok(sample_records())));
	let payload = serde_json::json!({ "question": "Which opera in Vienna?" });
	let (status, json) = call(app, post_json("/api/v1/ask", payload)).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["answer"], "Book two seats for the Vienna opera.");
	assert_eq!(json["sources"][0], "m-1");
	assert_eq!(json["sources"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn get_ask_reads_question_from_query() {
	let app = routes::router(test_state(Ok(sample_records())));
	let (status, json) = call(app, get("/api/v1/ask?question=Vienna%20opera%20seats")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["sources"][0], "m-1");
}

#[tokio::test]
async fn empty_corpus_answers_with_null_sources() {
	let app = routes::router(test_state(Ok(Vec::new())));
	let payload = serde_json::json!({ "question": "Anything new?" });
	let (status, json) = call(app, post_json("/api/v1/ask", payload)).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["answer"], "I could not find any messages to answer your question.");
	assert_eq!(json["sources"], Value::Null);
}

#[tokio::test]
async fn blank_question_is_bad_request() {
	let app = routes::router(test_state(Ok(sample_records())));
	let payload = serde_json::json!({ "question": "  " });
	let (status, json) = call(app, post_json("/api/v1/ask", payload)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
	let app = routes::router(test_state(Err("HTTP 503: unavailable".to_string())));
	let payload = serde_json::json!({ "question": "Who booked the opera?" });
	let (status, json) = call(app, post_json("/api/v1/ask", payload)).await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(json["error_code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn admin_invalidate_clears_cache() {
	let state = test_state(Ok(sample_records()));
	let app = routes::router(state.clone());
	let admin = routes::admin_router(state.clone());
	let payload = serde_json::json!({ "question": "Which opera in Vienna?" });
	let (status, _) = call(app, post_json("/api/v1/ask", payload)).await;

	assert_eq!(status, StatusCode::OK);
	assert!(state.service.cache_status().cached);

	let (status, json) = call(admin.clone(), get("/admin/v1/cache")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["records"], 2);

	let request = Request::builder()
		.method("POST")
		.uri("/admin/v1/cache/invalidate")
		.body(Body::empty())
		.expect("Failed to build request.");
	let (status, _) = call(admin, request).await;

	assert_eq!(status, StatusCode::NO_CONTENT);
	assert!(!state.service.cache_status().cached);
}
