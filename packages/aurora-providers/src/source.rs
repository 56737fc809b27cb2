use std::time::Duration;

use reqwest::{
	Client, StatusCode,
	header::{ACCEPT, HeaderMap, HeaderValue},
	redirect::Policy,
};
use serde::Deserialize;

use crate::{Error, Result};
use aurora_config::Source;
use aurora_domain::Record;

const MAX_REDIRECTS: usize = 5;
const MAX_ERROR_BODY_CHARS: usize = 500;

/// One page of the upstream messages API.
#[derive(Debug, Deserialize)]
pub struct Page {
	pub total: usize,
	#[serde(default)]
	pub items: Vec<Record>,
}

pub fn client(cfg: &Source) -> Result<Client> {
	let mut headers = HeaderMap::new();

	headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

	let client = Client::builder()
		.timeout(Duration::from_millis(cfg.timeout_ms))
		.redirect(Policy::limited(MAX_REDIRECTS))
		.user_agent(cfg.user_agent.as_str())
		.default_headers(headers)
		.build()?;

	Ok(client)
}

pub async fn fetch_page(client: &Client, cfg: &Source, skip: usize, limit: u32) -> Result<Page> {
	let url = format!("{}{}", cfg.api_base, cfg.path);

	tracing::debug!(skip, limit, "Fetching messages page.");

	let res =
		client.get(url).query(&[("skip", skip as u64), ("limit", limit as u64)]).send().await?;
	let status = res.status();

	if !status.is_success() {
		let body = res.text().await.unwrap_or_default();
		let excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();

		tracing::error!(
			status = status.as_u16(),
			error_text = %excerpt,
			"Messages API returned error status."
		);

		return Err(status_error(status, &excerpt));
	}

	Ok(res.json().await?)
}

/// Fetches every record, page by page, in the order the API returns them.
pub async fn fetch_all(cfg: &Source) -> Result<Vec<Record>> {
	let client = client(cfg)?;
	let mut records = Vec::new();
	let mut skip = 0_usize;
	let mut expected_total = None;

	tracing::info!(api_base = %cfg.api_base, path = %cfg.path, "Fetching messages from API.");

	loop {
		let page = fetch_page(&client, cfg, skip, cfg.page_size).await?;
		let page_len = page.items.len();
		let total = *expected_total.get_or_insert_with(|| {
			tracing::info!(total = page.total, "Total messages available.");

			page.total
		});

		records.extend(page.items);

		if !has_more(records.len(), total, page_len, cfg.page_size) {
			break;
		}

		skip += cfg.page_size as usize;
	}

	tracing::info!(count = records.len(), "Fetched all messages.");

	Ok(records)
}

fn has_more(fetched: usize, total: usize, page_len: usize, page_size: u32) -> bool {
	fetched < total && page_len >= page_size as usize && page_len > 0
}

fn status_error(status: StatusCode, excerpt: &str) -> Error {
	let message = match status {
		StatusCode::PAYMENT_REQUIRED => format!(
			"Payment required (HTTP 402): the messages API requires payment or has reached quota \
			 limits. Response: {excerpt}"
		),
		StatusCode::TOO_MANY_REQUESTS => format!(
			"Rate limit exceeded (HTTP 429): the messages API is rate limiting requests. Response: \
			 {excerpt}"
		),
		_ => format!("HTTP {}: {excerpt}", status.as_u16()),
	};

	Error::Status { status: status.as_u16(), message }
}
