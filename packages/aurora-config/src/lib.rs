mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	AnswerProviderConfig, Cache, Config, EmbeddingProviderConfig, Providers, Retrieval, Service,
	Source,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.source.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "source.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.source.page_size == 0 {
		return Err(Error::Validation {
			message: "source.page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if !(0.0..=2.0).contains(&cfg.providers.answer.temperature) {
		return Err(Error::Validation {
			message: "providers.answer.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if cfg.providers.answer.max_attempts == 0 {
		return Err(Error::Validation {
			message: "providers.answer.max_attempts must be greater than zero.".to_string(),
		});
	}

	for (label, key) in
		[("embedding", &cfg.providers.embedding.api_key), ("answer", &cfg.providers.answer.api_key)]
	{
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	let retrieval = &cfg.retrieval;

	if retrieval.top_k == 0 {
		return Err(Error::Validation {
			message: "retrieval.top_k must be greater than zero.".to_string(),
		});
	}

	for (label, weight) in [
		("retrieval.embedding_weight", retrieval.embedding_weight),
		("retrieval.keyword_weight", retrieval.keyword_weight),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if weight < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	if retrieval.embedding_weight == 0.0 && retrieval.keyword_weight == 0.0 {
		return Err(Error::Validation {
			message: "retrieval weights must not both be zero.".to_string(),
		});
	}
	if cfg.cache.ttl_secs == 0 {
		return Err(Error::Validation {
			message: "cache.ttl_secs must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.cache.path.as_deref().map(|path| path.as_os_str().is_empty()).unwrap_or(false) {
		cfg.cache.path = None;
	}
	if let Some(words) = cfg.retrieval.stop_words.as_mut() {
		words.retain(|word| !word.trim().is_empty());

		for word in words.iter_mut() {
			*word = word.trim().to_string();
		}
	}

	cfg.source.user_agent = cfg.source.user_agent.trim().to_string();
}
