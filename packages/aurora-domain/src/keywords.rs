use std::{
	collections::{HashMap, HashSet},
	sync::LazyLock,
};

use regex::Regex;

pub const MIN_KEYWORD_CHARS: usize = 3;
pub const DEFAULT_STOP_WORDS: [&str; 51] = [
	"the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
	"are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
	"could", "should", "may", "might", "can", "i", "you", "he", "she", "it", "we", "they", "this",
	"that", "these", "those", "what", "where", "when", "why", "how", "who", "which",
];

static WORD_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\b\w+\b").expect("Word pattern must compile."));

/// Turns free text into the keyword set used for lexical matching.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
	case_sensitive: bool,
	stop_words: HashSet<String>,
}
impl KeywordExtractor {
	pub fn new(case_sensitive: bool) -> Self {
		Self::with_stop_words(case_sensitive, DEFAULT_STOP_WORDS)
	}

	pub fn with_stop_words<I, S>(case_sensitive: bool, stop_words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let stop_words = stop_words.into_iter().map(|word| word.as_ref().to_lowercase()).collect();

		Self { case_sensitive, stop_words }
	}

	pub fn case_sensitive(&self) -> bool {
		self.case_sensitive
	}

	/// Keywords of `text`: word-boundary tokens longer than two characters that are not stop
	/// words. Stop words are compared case-insensitively even in case-sensitive mode.
	pub fn extract(&self, text: &str) -> HashSet<String> {
		self.tokens(text).filter(|token| self.is_keyword(token)).collect()
	}

	/// Whole-word occurrence counts of every token in `text`, keywords or not.
	pub fn token_counts(&self, text: &str) -> HashMap<String, usize> {
		let mut counts = HashMap::new();

		for token in self.tokens(text) {
			*counts.entry(token).or_insert(0) += 1;
		}

		counts
	}

	pub fn is_keyword(&self, token: &str) -> bool {
		token.chars().count() >= MIN_KEYWORD_CHARS
			&& !self.stop_words.contains(&token.to_lowercase())
	}

	fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
		WORD_RE.find_iter(text).map(move |m| {
			if self.case_sensitive { m.as_str().to_string() } else { m.as_str().to_lowercase() }
		})
	}
}
impl Default for KeywordExtractor {
	fn default() -> Self {
		Self::new(false)
	}
}
