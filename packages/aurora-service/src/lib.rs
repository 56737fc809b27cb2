pub mod admin;
pub mod cache;
pub mod embedding;
pub mod qa;
pub mod search;
pub mod source;
pub mod time_serde;

mod error;

pub use admin::CacheStatus;
pub use cache::{CacheEntry, EmbeddingCache};
pub use embedding::Embedder;
pub use error::{Error, Result};
pub use qa::{AskRequest, QaAnswer};
pub use search::{HybridScorer, Retriever};
pub use source::HttpRecordSource;

use std::{future::Future, pin::Pin, sync::Arc};

use aurora_config::{AnswerProviderConfig, Config, EmbeddingProviderConfig};
use aurora_domain::{Record, ScoredRecord};
use aurora_providers::{answer, embedding as embedding_api};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

/// Supplies the full, ordered record corpus.
pub trait RecordSource
where
	Self: Send + Sync,
{
	fn fetch_all(&self, force_refresh: bool) -> BoxFuture<'_, Result<Vec<Record>>>;
}

pub trait AnswerProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a AnswerProviderConfig,
		question: &'a str,
		ranked: &'a [ScoredRecord],
	) -> BoxFuture<'a, Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub source: Arc<dyn RecordSource>,
	pub answer: Arc<dyn AnswerProvider>,
}
impl Providers {
	pub fn from_config(cfg: &Config) -> Self {
		Self {
			embedding: Arc::new(DefaultProviders),
			source: Arc::new(HttpRecordSource::new(cfg.source.clone())),
			answer: Arc::new(DefaultProviders),
		}
	}
}

pub struct AuroraService {
	pub cfg: Config,
	pub providers: Providers,
	pub retriever: Retriever,
}
impl AuroraService {
	pub fn new(cfg: Config) -> Self {
		let providers = Providers::from_config(&cfg);

		Self::with_providers(cfg, providers)
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		let retriever = Retriever::new(&cfg, providers.embedding.clone());

		Self { cfg, providers, retriever }
	}
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			embedding_api::embed(cfg, texts)
				.await
				.map_err(|err| Error::Embedding { message: err.to_string() })
		})
	}
}

impl AnswerProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a AnswerProviderConfig,
		question: &'a str,
		ranked: &'a [ScoredRecord],
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			answer::generate(cfg, question, ranked)
				.await
				.map_err(|err| Error::Generation { message: err.to_string() })
		})
	}
}
