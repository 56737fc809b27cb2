use std::cmp::Ordering;

use aurora_domain::{Record, ScoredRecord};

/// Descending order with NaN sorted last.
pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

/// Pairs records with scores and keeps the best `k`. Ties keep corpus order.
pub fn top_k(records: &[Record], scores: &[f32], k: usize) -> Vec<ScoredRecord> {
	let mut order: Vec<usize> = (0..records.len().min(scores.len())).collect();

	order.sort_by(|a, b| cmp_f32_desc(scores[*a], scores[*b]));
	order.truncate(k);

	order
		.into_iter()
		.map(|idx| ScoredRecord { record: records[idx].clone(), score: scores[idx] })
		.collect()
}
