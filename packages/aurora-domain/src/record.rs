use serde::{Deserialize, Serialize};

/// One message of the corpus as delivered by the upstream API.
///
/// The core never parses `timestamp`; it is carried verbatim into the formatted text. Fields the
/// upstream omits decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
	pub id: String,
	#[serde(rename = "user_id")]
	pub author_id: String,
	#[serde(rename = "user_name")]
	pub author_name: String,
	pub timestamp: String,
	#[serde(rename = "message")]
	pub text: String,
}
impl Record {
	/// Renders the record as the single line that is embedded and keyword-matched.
	///
	/// Pure in the record, so identical records always yield identical fingerprints.
	pub fn formatted_text(&self) -> String {
		self.labeled_parts().join(" | ")
	}

	/// Multi-line rendering used when records are shown to a generation model.
	pub fn prompt_text(&self) -> String {
		self.labeled_parts().join("\n")
	}

	fn labeled_parts(&self) -> Vec<String> {
		let mut parts = Vec::with_capacity(4);

		if !self.author_name.is_empty() {
			parts.push(format!("From: {}", self.author_name));
		}
		if !self.author_id.is_empty() {
			parts.push(format!("User ID: {}", self.author_id));
		}
		if !self.text.is_empty() {
			parts.push(format!("Message: {}", self.text));
		}
		if !self.timestamp.is_empty() {
			parts.push(format!("Time: {}", self.timestamp));
		}

		parts
	}
}

/// A record paired with the hybrid score it was ranked by. Recomputed for every query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
	pub record: Record,
	pub score: f32,
}

pub fn format_all(records: &[Record]) -> Vec<String> {
	records.iter().map(Record::formatted_text).collect()
}
