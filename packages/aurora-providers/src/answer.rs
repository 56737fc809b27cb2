use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};
use aurora_config::AnswerProviderConfig;
use aurora_domain::ScoredRecord;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions based on \
provided data. Always respond with valid JSON containing an 'answer' field.";
const BACKOFF_BASE_SECS: u64 = 2;
const BACKOFF_MAX_SECS: u64 = 10;

/// Asks the chat endpoint to answer `question` from the ranked records, retrying transient
/// failures with exponential backoff.
pub async fn generate(
	cfg: &AnswerProviderConfig,
	question: &str,
	ranked: &[ScoredRecord],
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let messages = build_messages(question, ranked);
	let attempts = cfg.max_attempts.max(1);
	let mut last_err = None;

	for attempt in 0..attempts {
		match request_answer(&client, cfg, &messages).await {
			Ok(answer) => {
				tracing::info!(answer_length = answer.len(), attempt, "Generated answer.");

				return Ok(answer);
			},
			Err(err) => {
				tracing::warn!(error = %err, attempt, "Answer generation attempt failed.");

				last_err = Some(err);

				if attempt + 1 < attempts {
					tokio::time::sleep(backoff(attempt)).await;
				}
			},
		}
	}

	Err(last_err.unwrap_or_else(|| Error::InvalidResponse {
		message: "Answer generation made no attempts.".to_string(),
	}))
}

async fn request_answer(
	client: &Client,
	cfg: &AnswerProviderConfig,
	messages: &[Value],
) -> Result<String> {
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let mut body = serde_json::json!({
		"model": cfg.model,
		"messages": messages,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
	});

	if cfg.json_mode {
		body["response_format"] = serde_json::json!({ "type": "json_object" });
	}

	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_answer_response(json)
}

pub fn build_prompt(question: &str, ranked: &[ScoredRecord]) -> String {
	let mut parts = vec![
		"You are a helpful assistant that answers questions based on provided message data."
			.to_string(),
		"Analyze the following messages and answer the question concisely.".to_string(),
		String::new(),
		"Question:".to_string(),
		question.to_string(),
		String::new(),
		"Relevant Messages:".to_string(),
	];

	for (idx, scored) in ranked.iter().enumerate() {
		parts.push(format!("\n[{}] (relevance: {:.3})", idx + 1, scored.score));
		parts.push(scored.record.prompt_text());
	}

	parts.extend(
		[
			"",
			"Instructions:",
			"1. Extract the specific answer from the messages above.",
			"2. If the answer is not found, respond with 'I could not find an answer to this \
			 question in the available messages.'",
			"3. Be concise and direct. Only provide the answer, no additional explanation.",
			"4. Return your response as a JSON object with a single 'answer' field.",
			"",
			"Response (JSON only):",
		]
		.map(str::to_string),
	);

	parts.join("\n")
}

fn build_messages(question: &str, ranked: &[ScoredRecord]) -> Vec<Value> {
	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": build_prompt(question, ranked) }),
	]
}

fn parse_answer_response(json: Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Answer response is missing message content.".to_string(),
		})?;

	Ok(extract_answer(content))
}

/// Pulls the `answer` field out of model output, tolerating Markdown code fences and plain text.
pub fn extract_answer(content: &str) -> String {
	if let Some(answer) = answer_field(content) {
		return answer;
	}

	let mut cleaned = content.trim();

	if let Some(rest) = cleaned.strip_prefix("```json") {
		cleaned = rest;
	} else if let Some(rest) = cleaned.strip_prefix("```") {
		cleaned = rest;
	}
	if let Some(rest) = cleaned.strip_suffix("```") {
		cleaned = rest;
	}

	let cleaned = cleaned.trim();

	match answer_field(cleaned) {
		Some(answer) => answer,
		None => {
			tracing::warn!("Failed to parse answer response as JSON; using raw text.");

			cleaned.to_string()
		},
	}
}

fn answer_field(raw: &str) -> Option<String> {
	let value: Value = serde_json::from_str(raw).ok()?;

	match value.get("answer") {
		Some(Value::String(answer)) => Some(answer.clone()),
		Some(other) => Some(other.to_string()),
		None => Some(raw.to_string()),
	}
}

fn backoff(attempt: u32) -> Duration {
	let secs = BACKOFF_BASE_SECS.saturating_mul(1_u64 << attempt.min(16)).min(BACKOFF_MAX_SECS);

	Duration::from_secs(secs)
}
