use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AuroraService;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheStatus {
	pub cached: bool,
	pub records: usize,
	pub model_id: Option<String>,
	#[serde(with = "crate::time_serde::option")]
	pub created_at: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde::option")]
	pub expires_at: Option<OffsetDateTime>,
}

impl AuroraService {
	/// Forces the next retrieval to recompute every record embedding.
	pub fn invalidate_cache(&self) {
		self.retriever.invalidate_cache();
	}

	pub fn cache_status(&self) -> CacheStatus {
		let cache = self.retriever.cache();
		let Some(entry) = cache.current() else {
			return CacheStatus {
				cached: false,
				records: 0,
				model_id: None,
				created_at: None,
				expires_at: None,
			};
		};

		CacheStatus {
			cached: true,
			records: entry.fingerprints.len(),
			model_id: Some(entry.model_id.clone()),
			created_at: Some(entry.created_at),
			expires_at: entry.created_at.checked_add(cache.ttl()),
		}
	}
}
