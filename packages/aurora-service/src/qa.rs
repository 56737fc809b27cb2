use serde::{Deserialize, Serialize};

use crate::{AuroraService, Error, Result};
use aurora_domain::{ScoredRecord, record};

pub const NO_MESSAGES_ANSWER: &str = "I could not find any messages to answer your question.";
pub const NO_RELEVANT_ANSWER: &str =
	"I could not find relevant information to answer your question.";

#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
	pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaAnswer {
	pub answer: String,
	/// Ids of the records the answer was grounded on, in rank order.
	pub sources: Option<Vec<String>>,
}
impl QaAnswer {
	fn without_sources(answer: &str) -> Self {
		Self { answer: answer.to_string(), sources: None }
	}
}

impl AuroraService {
	pub async fn answer_question(&self, question: &str) -> Result<QaAnswer> {
		let question = question.trim();

		if question.is_empty() {
			return Err(Error::InvalidRequest { message: "Question cannot be empty.".to_string() });
		}

		let records = self.providers.source.fetch_all(false).await?;

		if records.is_empty() {
			tracing::warn!("No messages available to answer the question.");

			return Ok(QaAnswer::without_sources(NO_MESSAGES_ANSWER));
		}

		let texts = record::format_all(&records);
		let top_k = self.cfg.retrieval.top_k as usize;
		let ranked = self.retriever.retrieve_formatted(question, &records, &texts, top_k).await?;

		if ranked.is_empty() {
			return Ok(QaAnswer::without_sources(NO_RELEVANT_ANSWER));
		}

		let answer =
			self.providers.answer.generate(&self.cfg.providers.answer, question, &ranked).await?;

		tracing::info!(
			sources = ranked.len(),
			answer_chars = answer.chars().count(),
			"Generated answer."
		);

		Ok(QaAnswer { answer, sources: Some(source_ids(&ranked)) })
	}
}

fn source_ids(ranked: &[ScoredRecord]) -> Vec<String> {
	ranked
		.iter()
		.enumerate()
		.map(|(rank, item)| {
			if item.record.id.is_empty() { format!("msg_{rank}") } else { item.record.id.clone() }
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use aurora_domain::Record;

	#[test]
	fn blank_ids_get_positional_names() {
		let ranked = vec![
			ScoredRecord {
				record: Record { id: "a1".to_string(), ..Default::default() },
				score: 0.9,
			},
			ScoredRecord { record: Record::default(), score: 0.4 },
		];

		assert_eq!(source_ids(&ranked), vec!["a1".to_string(), "msg_1".to_string()]);
	}

	#[test]
	fn empty_answers_serialize_null_sources() {
		let json = serde_json::to_value(QaAnswer::without_sources(NO_MESSAGES_ANSWER))
			.expect("Failed to encode answer.");

		assert_eq!(json["sources"], serde_json::Value::Null);
	}
}
