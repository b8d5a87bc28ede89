mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Display, EmbeddingProviderConfig, IMAGE_SOURCES, INDEX_BACKENDS, Index, Postgres,
	Providers, SEARCH_STRATEGIES, Search, Security, Service, Storage,
};

use std::{collections::HashSet, fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::Parse { source, .. } => Error::Parse { path: path.to_path_buf(), source },
		other => other,
	})
}

pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::Parse { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind", "must be non-empty."));
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::invalid("service.admin_bind", "must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::invalid("storage.postgres.pool_max_conns", "must be greater than zero."));
	}

	let backend = cfg.storage.index.backend.as_str();

	if !INDEX_BACKENDS.contains(&backend) {
		return Err(Error::invalid("storage.index.backend", "must be one of qdrant or memory."));
	}
	if backend == "qdrant" && cfg.storage.index.url.trim().is_empty() {
		return Err(Error::invalid(
			"storage.index.url",
			"must be non-empty when the qdrant backend is selected.",
		));
	}
	if cfg.storage.index.collection.trim().is_empty() {
		return Err(Error::invalid("storage.index.collection", "must be non-empty."));
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::invalid("providers.embedding.dimensions", "must be greater than zero."));
	}
	if cfg.providers.embedding.dimensions != cfg.storage.index.vector_dim {
		return Err(Error::invalid(
			"providers.embedding.dimensions",
			"must match storage.index.vector_dim.",
		));
	}
	if cfg.providers.embedding.api_key.trim().is_empty() {
		return Err(Error::invalid("providers.embedding.api_key", "must be non-empty."));
	}
	if cfg.providers.embedding.timeout_ms == 0 {
		return Err(Error::invalid("providers.embedding.timeout_ms", "must be greater than zero."));
	}

	validate_search(&cfg.search)?;
	validate_display(&cfg.display)?;

	Ok(())
}

fn validate_search(search: &Search) -> Result<()> {
	if !SEARCH_STRATEGIES.contains(&search.strategy.as_str()) {
		return Err(Error::invalid("search.strategy", "must be one of grouped or flat."));
	}

	for (field, value) in [
		("search.group_size", search.group_size),
		("search.flat_k_multiplier", search.flat_k_multiplier),
		("search.max_owners", search.max_owners),
		("search.result_limit", search.result_limit),
	] {
		if value == 0 {
			return Err(Error::invalid(field, "must be greater than zero."));
		}
	}

	for (field, value) in [
		("search.max_image_bytes", search.max_image_bytes),
		("search.max_sessions", search.max_sessions),
	] {
		if value == 0 {
			return Err(Error::invalid(field, "must be greater than zero."));
		}
	}

	Ok(())
}

fn validate_display(display: &Display) -> Result<()> {
	if display.image_precedence.is_empty() {
		return Err(Error::invalid("display.image_precedence", "must be non-empty."));
	}

	let mut seen = HashSet::new();

	for source in &display.image_precedence {
		if !IMAGE_SOURCES.contains(&source.as_str()) {
			return Err(Error::invalid(
				"display.image_precedence",
				format!(
					"contains unknown source '{source}'; expected media_proxy, url, or media_url."
				),
			));
		}
		if !seen.insert(source.as_str()) {
			return Err(Error::invalid(
				"display.image_precedence",
				format!("lists '{source}' more than once."),
			));
		}
	}

	if !display.proxy_path_template.contains("{media_id}") {
		return Err(Error::invalid(
			"display.proxy_path_template",
			"must contain the {media_id} placeholder.",
		));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.search.strategy = cfg.search.strategy.trim().to_ascii_lowercase();
	cfg.storage.index.backend = cfg.storage.index.backend.trim().to_ascii_lowercase();

	for source in &mut cfg.display.image_precedence {
		*source = source.trim().to_ascii_lowercase();
	}

	if cfg.security.api_auth_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false)
	{
		cfg.security.api_auth_token = None;
	}
	if cfg
		.security
		.admin_auth_token
		.as_deref()
		.map(|token| token.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.security.admin_auth_token = None;
	}
}
