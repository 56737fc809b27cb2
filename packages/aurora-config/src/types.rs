use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub source: Source,
	pub providers: Providers,
	#[serde(default)]
	pub retrieval: Retrieval,
	#[serde(default)]
	pub cache: Cache,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

/// Upstream messages API that supplies the record corpus.
#[derive(Debug, Clone, Deserialize)]
pub struct Source {
	pub api_base: String,
	pub path: String,
	#[serde(default = "default_page_size")]
	pub page_size: u32,
	pub timeout_ms: u64,
	/// Seconds a fetched corpus may be reused before the next query refetches it. Zero disables
	/// reuse.
	#[serde(default)]
	pub snapshot_ttl_secs: u64,
	#[serde(default = "default_user_agent")]
	pub user_agent: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub answer: AnswerProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	#[serde(default = "default_temperature")]
	pub temperature: f32,
	#[serde(default = "default_max_tokens")]
	pub max_tokens: u32,
	pub timeout_ms: u64,
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	/// Request `response_format = json_object` from the chat endpoint.
	#[serde(default)]
	pub json_mode: bool,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Retrieval {
	pub top_k: u32,
	pub embedding_weight: f32,
	pub keyword_weight: f32,
	/// Minimum number of query keywords a record must match before it escapes demotion. Zero
	/// disables the filter.
	pub min_keyword_matches: u32,
	pub case_sensitive: bool,
	/// Replaces the built-in stop-word list when present.
	pub stop_words: Option<Vec<String>>,
}
impl Default for Retrieval {
	fn default() -> Self {
		Self {
			top_k: 5,
			embedding_weight: 0.7,
			keyword_weight: 0.3,
			min_keyword_matches: 1,
			case_sensitive: false,
			stop_words: None,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Cache {
	/// On-disk slot for the embedding matrix. Memory-only when absent.
	pub path: Option<PathBuf>,
	pub ttl_secs: u64,
}
impl Default for Cache {
	fn default() -> Self {
		Self { path: None, ttl_secs: 86_400 }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_page_size() -> u32 {
	100
}

fn default_user_agent() -> String {
	"Aurora-QA-Service/1.0".to_string()
}

fn default_temperature() -> f32 {
	0.1
}

fn default_max_tokens() -> u32 {
	200
}

fn default_max_attempts() -> u32 {
	3
}
