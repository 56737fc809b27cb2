use std::fmt;

use serde::{Deserialize, Serialize};

const FINGERPRINT_BYTES: usize = 16;

/// 128-bit content digest of a formatted text, hex encoded.
///
/// Used only to decide whether cached embeddings still describe the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);
impl Fingerprint {
	pub fn of(text: &str) -> Self {
		let hex = blake3::hash(text.as_bytes()).to_hex();

		Self(hex.as_str()[..FINGERPRINT_BYTES * 2].to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl fmt::Display for Fingerprint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

pub fn fingerprint_all<S>(texts: &[S]) -> Vec<Fingerprint>
where
	S: AsRef<str>,
{
	texts.iter().map(|text| Fingerprint::of(text.as_ref())).collect()
}
