use std::sync::Arc;

use crate::{EmbeddingProvider, Error, Result};
use aurora_config::EmbeddingProviderConfig;

/// Front for the embedding provider that guarantees unit-length vectors of the configured
/// dimension. Blank texts map to the zero vector without a provider call.
#[derive(Clone)]
pub struct Embedder {
	provider: Arc<dyn EmbeddingProvider>,
	cfg: EmbeddingProviderConfig,
}
impl Embedder {
	pub fn new(provider: Arc<dyn EmbeddingProvider>, cfg: EmbeddingProviderConfig) -> Self {
		Self { provider, cfg }
	}

	pub fn dimensions(&self) -> usize {
		self.cfg.dimensions as usize
	}

	/// Identity of the vectors this embedder produces; cached matrices from another identity are
	/// never reused.
	pub fn model_id(&self) -> String {
		format!("{}:{}:{}", self.cfg.provider_id, self.cfg.model, self.cfg.dimensions)
	}

	pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
		let mut vectors = self.embed_many(&[text.to_string()]).await?;

		vectors.pop().ok_or_else(|| Error::Embedding {
			message: "Embedding provider returned no vector.".to_string(),
		})
	}

	pub async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
		let dim = self.dimensions();
		let mut out = vec![vec![0.0_f32; dim]; texts.len()];
		let (positions, inputs): (Vec<usize>, Vec<String>) = texts
			.iter()
			.enumerate()
			.filter(|(_, text)| !text.trim().is_empty())
			.map(|(idx, text)| (idx, text.clone()))
			.unzip();

		if inputs.is_empty() {
			return Ok(out);
		}

		let vectors = self.provider.embed(&self.cfg, &inputs).await?;

		if vectors.len() != inputs.len() {
			return Err(Error::Embedding {
				message: format!(
					"Embedding provider returned {} vectors for {} inputs.",
					vectors.len(),
					inputs.len()
				),
			});
		}

		for (position, mut vector) in positions.into_iter().zip(vectors) {
			if vector.len() != dim {
				return Err(Error::Embedding {
					message: format!(
						"Embedding dimension mismatch: expected {dim}, got {}.",
						vector.len()
					),
				});
			}

			l2_normalize(&mut vector);

			out[position] = vector;
		}

		Ok(out)
	}
}

pub fn l2_normalize(vector: &mut [f32]) {
	let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();

	if norm > 0.0 && norm.is_finite() {
		for value in vector.iter_mut() {
			*value /= norm;
		}
	}
}

/// Dot product of two unit vectors, i.e. their cosine similarity.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
	a.iter().zip(b).map(|(x, y)| x * y).sum()
}
