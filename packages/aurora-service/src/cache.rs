//! Embedding matrix cache for the current corpus.
//!
//! One entry describes the whole corpus. It is valid only while its fingerprint sequence equals
//! the incoming one element for element and its TTL has not elapsed; any difference triggers a
//! full recompute that replaces the entry and overwrites the single on-disk slot.

use std::{
	fs, io,
	path::{Path, PathBuf},
	sync::{Arc, RwLock},
};

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

use crate::{Embedder, Result};
use aurora_domain::{Fingerprint, fingerprint};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	pub fingerprints: Vec<Fingerprint>,
	pub vectors: Vec<Vec<f32>>,
	pub model_id: String,
}
impl CacheEntry {
	pub fn is_expired(&self, ttl: Duration, now: OffsetDateTime) -> bool {
		now - self.created_at >= ttl
	}

	/// Order-sensitive comparison; a reordered corpus does not match.
	pub fn matches(&self, fingerprints: &[Fingerprint]) -> bool {
		self.fingerprints.len() == fingerprints.len()
			&& self.fingerprints.iter().zip(fingerprints).all(|(a, b)| a == b)
	}

	/// True when every vector has `dimensions` components.
	pub fn has_dimensions(&self, dimensions: usize) -> bool {
		self.vectors.iter().all(|vector| vector.len() == dimensions)
	}

	fn is_well_formed(&self) -> bool {
		if self.fingerprints.len() != self.vectors.len() {
			return false;
		}

		let Some(first) = self.vectors.first() else { return true };

		self.vectors.iter().all(|vector| vector.len() == first.len())
	}
}

#[derive(Debug, thiserror::Error)]
enum CacheIoError {
	#[error("Failed to read cache file at {path:?}: {source}")]
	Read { path: PathBuf, source: io::Error },
	#[error("Failed to decode cache file at {path:?}: {source}")]
	Decode { path: PathBuf, source: serde_json::Error },
	#[error("Cache file at {path:?} is malformed.")]
	Malformed { path: PathBuf },
	#[error("Failed to encode cache entry: {0}")]
	Encode(serde_json::Error),
	#[error("Failed to write cache file at {path:?}: {source}")]
	Write { path: PathBuf, source: io::Error },
}

pub struct EmbeddingCache {
	path: Option<PathBuf>,
	ttl: Duration,
	entry: RwLock<Option<Arc<CacheEntry>>>,
	// Held across the miss path so concurrent misses share one recompute.
	refresh: Mutex<()>,
}
impl EmbeddingCache {
	pub fn in_memory(ttl: Duration) -> Self {
		Self { path: None, ttl, entry: RwLock::new(None), refresh: Mutex::new(()) }
	}

	/// Opens the cache, seeding it from `path` when a readable entry for `model_id` with vectors
	/// of `dimensions` components is stored there. Unreadable or foreign files are ignored.
	pub fn open(path: Option<PathBuf>, ttl: Duration, model_id: &str, dimensions: usize) -> Self {
		let mut cache = Self::in_memory(ttl);
		let Some(path) = path else { return cache };

		match read_entry(&path) {
			Ok(Some(entry)) if entry.model_id == model_id && !entry.has_dimensions(dimensions) => {
				tracing::warn!(
					path = %path.display(),
					dimensions,
					"Ignoring embedding cache with mismatched vector dimensions."
				);
			},
			Ok(Some(entry)) if entry.model_id == model_id => {
				tracing::info!(
					path = %path.display(),
					records = entry.fingerprints.len(),
					"Loaded embedding cache from disk."
				);

				cache.entry = RwLock::new(Some(Arc::new(entry)));
			},
			Ok(Some(entry)) => {
				tracing::info!(
					path = %path.display(),
					cached_model = %entry.model_id,
					model = model_id,
					"Ignoring embedding cache built by another model."
				);
			},
			Ok(None) => {},
			Err(err) => {
				tracing::warn!(error = %err, "Embedding cache load failed; starting empty.");
			},
		}

		cache.path = Some(path);

		cache
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	pub fn current(&self) -> Option<Arc<CacheEntry>> {
		self.entry.read().unwrap_or_else(|err| err.into_inner()).clone()
	}

	/// Drops the in-memory entry so the next lookup recomputes regardless of TTL or fingerprints.
	/// The on-disk slot is left until it is overwritten.
	pub fn invalidate(&self) {
		*self.entry.write().unwrap_or_else(|err| err.into_inner()) = None;

		tracing::info!("Embedding cache invalidated.");
	}

	pub async fn get_or_compute(
		&self,
		texts: &[String],
		embedder: &Embedder,
	) -> Result<Arc<CacheEntry>> {
		self.get_or_compute_at(texts, embedder, OffsetDateTime::now_utc()).await
	}

	pub async fn get_or_compute_at(
		&self,
		texts: &[String],
		embedder: &Embedder,
		now: OffsetDateTime,
	) -> Result<Arc<CacheEntry>> {
		let fingerprints = fingerprint::fingerprint_all(texts);

		if let Some(entry) = self.valid_entry(&fingerprints, now) {
			tracing::info!(hit = true, records = texts.len(), "Embedding cache hit.");

			return Ok(entry);
		}

		let _guard = self.refresh.lock().await;

		if let Some(entry) = self.valid_entry(&fingerprints, now) {
			tracing::info!(hit = true, records = texts.len(), "Embedding cache filled by peer.");

			return Ok(entry);
		}

		tracing::info!(hit = false, records = texts.len(), "Embedding cache miss.");

		let vectors = embedder.embed_many(texts).await?;
		let entry = Arc::new(CacheEntry {
			created_at: now,
			fingerprints,
			vectors,
			model_id: embedder.model_id(),
		});

		*self.entry.write().unwrap_or_else(|err| err.into_inner()) = Some(entry.clone());

		if let Some(path) = self.path.as_deref()
			&& let Err(err) = write_entry(path, &entry)
		{
			tracing::warn!(error = %err, "Embedding cache persist failed.");
		}

		Ok(entry)
	}

	fn valid_entry(
		&self,
		fingerprints: &[Fingerprint],
		now: OffsetDateTime,
	) -> Option<Arc<CacheEntry>> {
		let entry = self.current()?;

		if entry.is_expired(self.ttl, now) || !entry.matches(fingerprints) {
			return None;
		}

		Some(entry)
	}
}

fn read_entry(path: &Path) -> Result<Option<CacheEntry>, CacheIoError> {
	let raw = match fs::read(path) {
		Ok(raw) => raw,
		Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
		Err(err) => return Err(CacheIoError::Read { path: path.to_path_buf(), source: err }),
	};
	let entry: CacheEntry = serde_json::from_slice(&raw)
		.map_err(|err| CacheIoError::Decode { path: path.to_path_buf(), source: err })?;

	if !entry.is_well_formed() {
		return Err(CacheIoError::Malformed { path: path.to_path_buf() });
	}

	Ok(Some(entry))
}

/// Writes beside the target and renames over it so readers never observe a partial file.
fn write_entry(path: &Path, entry: &CacheEntry) -> Result<(), CacheIoError> {
	let raw = serde_json::to_vec(entry).map_err(CacheIoError::Encode)?;
	let write_err = |source| CacheIoError::Write { path: path.to_path_buf(), source };

	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		fs::create_dir_all(parent).map_err(write_err)?;
	}

	let mut tmp = path.as_os_str().to_owned();

	tmp.push(format!(".{}.tmp", std::process::id()));

	let tmp = PathBuf::from(tmp);

	fs::write(&tmp, &raw).map_err(write_err)?;

	if let Err(err) = fs::rename(&tmp, path) {
		let _ = fs::remove_file(&tmp);

		return Err(write_err(err));
	}

	Ok(())
}
