use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::{BoxFuture, Error, RecordSource, Result};
use aurora_config::Source;
use aurora_domain::Record;
use aurora_providers::source;

struct Snapshot {
	fetched_at: Instant,
	records: Vec<Record>,
}

/// Record source backed by the paginated messages API.
///
/// The last full fetch is reused for `snapshot_ttl_secs`; a TTL of zero fetches on every call.
pub struct HttpRecordSource {
	cfg: Source,
	snapshot: Mutex<Option<Snapshot>>,
}
impl HttpRecordSource {
	pub fn new(cfg: Source) -> Self {
		Self { cfg, snapshot: Mutex::new(None) }
	}

	async fn load(&self, force_refresh: bool) -> Result<Vec<Record>> {
		let ttl = Duration::from_secs(self.cfg.snapshot_ttl_secs);
		let mut snapshot = self.snapshot.lock().await;

		if !force_refresh
			&& !ttl.is_zero()
			&& let Some(current) = snapshot.as_ref()
			&& current.fetched_at.elapsed() < ttl
		{
			return Ok(current.records.clone());
		}

		let records = source::fetch_all(&self.cfg)
			.await
			.map_err(|err| Error::Source { message: err.to_string() })?;

		tracing::info!(records = records.len(), force_refresh, "Fetched messages.");

		if !ttl.is_zero() {
			*snapshot = Some(Snapshot { fetched_at: Instant::now(), records: records.clone() });
		}

		Ok(records)
	}
}

impl RecordSource for HttpRecordSource {
	fn fetch_all(&self, force_refresh: bool) -> BoxFuture<'_, Result<Vec<Record>>> {
		Box::pin(self.load(force_refresh))
	}
}
