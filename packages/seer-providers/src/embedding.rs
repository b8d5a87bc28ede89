use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Sends one image to an OpenAI-style embeddings endpoint and returns its vector.
///
/// The image travels base64-encoded in `input`; the response must carry a `data` array whose
/// first entry (by `index`) holds the embedding.
pub async fn embed_image(
	cfg: &seer_config::EmbeddingProviderConfig,
	image: &[u8],
) -> Result<Vec<f32>> {
	if image.is_empty() {
		return Err(Error::EmptyImage);
	}

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": [STANDARD.encode(image)],
		"encoding": "base64",
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;
	let mut vectors = parse_embedding_response(json)?;

	tracing::debug!(provider_id = %cfg.provider_id, bytes = image.len(), "Image embedded.");

	if vectors.is_empty() {
		return Err(Error::InvalidResponse {
			message: "Embedding response contained no vectors.".to_string(),
		});
	}

	Ok(vectors.swap_remove(0))
}

fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	let invalid = |message: &str| Error::InvalidResponse { message: message.to_string() };
	let data = json
		.get("data")
		.and_then(|v| v.as_array())
		.ok_or_else(|| invalid("Embedding response is missing data array."))?;
	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());

	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let embedding = item
			.get("embedding")
			.and_then(|v| v.as_array())
			.ok_or_else(|| invalid("Embedding item missing embedding array."))?;
		let vector = embedding
			.iter()
			.map(|value| value.as_f64().map(|number| number as f32))
			.collect::<Option<Vec<f32>>>()
			.ok_or_else(|| invalid("Embedding value must be numeric."))?;

		indexed.push((index, vector));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vector)| vector).collect())
}
