use std::collections::HashSet;

use aurora_config::Retrieval;
use aurora_domain::KeywordExtractor;

const COVERAGE_WEIGHT: f32 = 0.6;
const FREQUENCY_WEIGHT: f32 = 0.4;
const MAX_COUNTED_OCCURRENCES: usize = 3;
const DEMOTION_FACTOR: f32 = 0.1;

/// Fuses normalized embedding similarity with keyword overlap into one ranking score.
#[derive(Debug, Clone)]
pub struct HybridScorer {
	extractor: KeywordExtractor,
	embedding_weight: f32,
	keyword_weight: f32,
	min_keyword_matches: u32,
}
impl HybridScorer {
	pub fn new(cfg: &Retrieval) -> Self {
		let extractor = match cfg.stop_words.as_ref() {
			Some(words) => KeywordExtractor::with_stop_words(cfg.case_sensitive, words),
			None => KeywordExtractor::new(cfg.case_sensitive),
		};

		Self {
			extractor,
			embedding_weight: cfg.embedding_weight,
			keyword_weight: cfg.keyword_weight,
			min_keyword_matches: cfg.min_keyword_matches,
		}
	}

	pub fn extractor(&self) -> &KeywordExtractor {
		&self.extractor
	}

	/// Keyword score of one formatted text in [0, 1].
	///
	/// Blends the share of query keywords present with how often they occur, counting at most
	/// three occurrences per keyword.
	pub fn keyword_score(&self, query_keywords: &HashSet<String>, text: &str) -> f32 {
		if query_keywords.is_empty() {
			return 0.0;
		}

		let counts = self.extractor.token_counts(text);
		let occurrences: Vec<usize> = query_keywords
			.iter()
			.filter_map(|keyword| counts.get(keyword).copied())
			.filter(|count| *count > 0)
			.collect();

		if occurrences.is_empty() {
			return 0.0;
		}

		let coverage = occurrences.len() as f32 / query_keywords.len() as f32;
		let cap = MAX_COUNTED_OCCURRENCES as f32;
		let frequency = occurrences.iter().map(|count| (*count as f32).min(cap) / cap).sum::<f32>()
			/ occurrences.len() as f32;

		(COVERAGE_WEIGHT * coverage + FREQUENCY_WEIGHT * frequency).clamp(0.0, 1.0)
	}

	/// Hybrid score per text, aligned with `texts`.
	///
	/// `embedding_scores` are cosine similarities in [-1, 1] and must be aligned with `texts`.
	/// When a keyword threshold is configured, records below it are demoted; if none clear it the
	/// query is ranked by embedding similarity alone.
	pub fn score(&self, query: &str, texts: &[String], embedding_scores: &[f32]) -> Vec<f32> {
		let query_keywords = self.extractor.extract(query);
		let keyword_scores: Vec<f32> =
			texts.iter().map(|text| self.keyword_score(&query_keywords, text)).collect();
		let normalized: Vec<f32> =
			embedding_scores.iter().map(|sim| ((sim + 1.0) / 2.0).clamp(0.0, 1.0)).collect();

		log_keyword_stats(&query_keywords, &keyword_scores);

		let hybrid: Vec<f32> = normalized
			.iter()
			.zip(&keyword_scores)
			.map(|(sim, kw)| self.embedding_weight * sim + self.keyword_weight * kw)
			.collect();

		if self.min_keyword_matches == 0 || query_keywords.is_empty() {
			return hybrid;
		}

		let threshold = self.min_keyword_matches as f32 / query_keywords.len() as f32;
		let passes: Vec<bool> = keyword_scores.iter().map(|kw| *kw >= threshold).collect();

		if !passes.iter().any(|pass| *pass) {
			tracing::warn!(
				threshold,
				"No records meet keyword threshold; falling back to embedding-only ranking."
			);

			return normalized;
		}

		hybrid
			.into_iter()
			.zip(passes)
			.map(|(score, pass)| if pass { score } else { score * DEMOTION_FACTOR })
			.collect()
	}
}

fn log_keyword_stats(query_keywords: &HashSet<String>, keyword_scores: &[f32]) {
	let with_keywords = keyword_scores.iter().filter(|score| **score > 0.0).count();
	let max = keyword_scores.iter().copied().fold(0.0_f32, f32::max);
	let avg = if keyword_scores.is_empty() {
		0.0
	} else {
		keyword_scores.iter().sum::<f32>() / keyword_scores.len() as f32
	};
	let mut keywords: Vec<&str> = query_keywords.iter().map(String::as_str).collect();

	keywords.sort_unstable();

	tracing::info!(
		query_keywords = ?keywords,
		messages_with_keywords = with_keywords,
		avg_keyword_score = avg,
		max_keyword_score = max,
		"Keyword matching results."
	);
}
