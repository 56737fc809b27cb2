pub mod ranking;
pub mod scoring;

pub use scoring::HybridScorer;

use std::sync::Arc;

use time::Duration;

use crate::{EmbeddingCache, Embedder, EmbeddingProvider, Error, Result, embedding};
use aurora_config::Config;
use aurora_domain::{Record, ScoredRecord, record};

/// Ranks a corpus against a query with cached record embeddings and hybrid scoring.
pub struct Retriever {
	embedder: Embedder,
	cache: EmbeddingCache,
	scorer: HybridScorer,
}
impl Retriever {
	pub fn new(cfg: &Config, provider: Arc<dyn EmbeddingProvider>) -> Self {
		let embedder = Embedder::new(provider, cfg.providers.embedding.clone());
		let ttl = Duration::seconds(i64::try_from(cfg.cache.ttl_secs).unwrap_or(i64::MAX));
		let cache = EmbeddingCache::open(
			cfg.cache.path.clone(),
			ttl,
			&embedder.model_id(),
			embedder.dimensions(),
		);

		Self::from_parts(embedder, cache, HybridScorer::new(&cfg.retrieval))
	}

	pub fn from_parts(embedder: Embedder, cache: EmbeddingCache, scorer: HybridScorer) -> Self {
		Self { embedder, cache, scorer }
	}

	pub fn cache(&self) -> &EmbeddingCache {
		&self.cache
	}

	pub fn scorer(&self) -> &HybridScorer {
		&self.scorer
	}

	pub fn invalidate_cache(&self) {
		self.cache.invalidate();
	}

	pub async fn retrieve(
		&self,
		query: &str,
		records: &[Record],
		k: usize,
	) -> Result<Vec<ScoredRecord>> {
		let texts = record::format_all(records);

		self.retrieve_formatted(query, records, &texts, k).await
	}

	/// Top `k` records by hybrid score, highest first.
	///
	/// `texts` must be the formatted text of `records`, index for index. An empty corpus yields an
	/// empty list without touching the embedding provider. Any embedding failure surfaces as
	/// [`Error::Retrieval`] and leaves the cache as it was.
	pub async fn retrieve_formatted(
		&self,
		query: &str,
		records: &[Record],
		texts: &[String],
		k: usize,
	) -> Result<Vec<ScoredRecord>> {
		if records.len() != texts.len() {
			return Err(Error::InvalidRequest {
				message: format!(
					"Expected one formatted text per record, got {} texts for {} records.",
					texts.len(),
					records.len()
				),
			});
		}
		if records.is_empty() || k == 0 {
			return Ok(Vec::new());
		}

		let query_vec = self.embedder.embed_one(query).await.map_err(Error::retrieval)?;
		let entry =
			self.cache.get_or_compute(texts, &self.embedder).await.map_err(Error::retrieval)?;
		let mut sims = Vec::with_capacity(entry.vectors.len());

		for vector in &entry.vectors {
			if vector.len() != query_vec.len() {
				return Err(Error::retrieval(Error::Embedding {
					message: format!(
						"Cached vector dimension {} does not match query dimension {}.",
						vector.len(),
						query_vec.len()
					),
				}));
			}

			sims.push(embedding::cosine(&query_vec, vector));
		}

		let scores = self.scorer.score(query, texts, &sims);
		let ranked = ranking::top_k(records, &scores, k);

		tracing::info!(
			corpus = records.len(),
			count = ranked.len(),
			top_score = ranked.first().map(|item| item.score),
			"Retrieved relevant records."
		);

		Ok(ranked)
	}
}
