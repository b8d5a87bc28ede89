use sqlx::PgPool;
use uuid::Uuid;

use seer_domain::{Item, ItemMeta, VectorRejection, similarity};

use crate::{Error, Result, models::ItemRow};

/// Reads every stored item in insertion order.
pub async fn load_items(pool: &PgPool) -> Result<Vec<Item>> {
	let rows: Vec<ItemRow> = sqlx::query_as(
		"\
SELECT
	item_id,
	seq,
	owner_id,
	embedding::text AS embedding_text,
	media_id,
	url,
	media_url,
	caption,
	width,
	height
FROM items
ORDER BY seq",
	)
	.fetch_all(pool)
	.await?;

	rows.into_iter().map(item_from_row).collect()
}

/// Rejects embeddings no index can score: wrong dimension, non-finite components or
/// magnitude, zero magnitude.
pub fn check_embedding(embedding: &[f32], dim: usize) -> Result<()> {
	match similarity::validate_query(embedding, dim) {
		Ok(()) => Ok(()),
		Err(VectorRejection::DimensionMismatch { expected, actual }) =>
			Err(Error::DimensionMismatch { expected, actual }),
		Err(rejection) =>
			Err(Error::InvalidArgument(format!("Unusable embedding: {}.", rejection.reason()))),
	}
}

/// Stores a new item and returns it with the database-assigned `seq`.
pub async fn insert_item(
	pool: &PgPool,
	owner_id: &str,
	embedding: &[f32],
	meta: &ItemMeta,
) -> Result<Item> {
	if embedding.is_empty() {
		return Err(Error::InvalidArgument("Item embedding must be non-empty.".to_string()));
	}

	let item_id = Uuid::new_v4();
	let seq: i64 = sqlx::query_scalar(
		"\
INSERT INTO items (item_id, owner_id, embedding, media_id, url, media_url, caption, width, height)
VALUES ($1, $2, $3::text::vector, $4, $5, $6, $7, $8, $9)
RETURNING seq",
	)
	.bind(item_id)
	.bind(owner_id)
	.bind(vector_to_pg(embedding))
	.bind(meta.media_id.as_deref())
	.bind(meta.url.as_deref())
	.bind(meta.media_url.as_deref())
	.bind(meta.caption.as_deref())
	.bind(meta.width)
	.bind(meta.height)
	.fetch_one(pool)
	.await?;
	let seq = u64::try_from(seq)
		.map_err(|_| Error::CorruptRow(format!("item {item_id} received a negative seq.")))?;

	Ok(Item {
		item_id,
		owner_id: owner_id.to_string(),
		seq,
		embedding: embedding.to_vec(),
		meta: meta.clone(),
	})
}

pub fn item_from_row(row: ItemRow) -> Result<Item> {
	let embedding = parse_pg_vector(&row.embedding_text)?;
	let seq = u64::try_from(row.seq)
		.map_err(|_| Error::CorruptRow(format!("item {} has a negative seq.", row.item_id)))?;

	Ok(Item {
		item_id: row.item_id,
		owner_id: row.owner_id,
		seq,
		embedding,
		meta: ItemMeta {
			media_id: row.media_id,
			url: row.url,
			media_url: row.media_url,
			caption: row.caption,
			width: row.width,
			height: row.height,
		},
	})
}

pub fn vector_to_pg(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8);

	out.push('[');

	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}

		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

pub fn parse_pg_vector(text: &str) -> Result<Vec<f32>> {
	let trimmed = text.trim();
	let inner = trimmed
		.strip_prefix('[')
		.and_then(|s| s.strip_suffix(']'))
		.ok_or_else(|| Error::CorruptRow("Vector text is not bracketed.".to_string()))?;

	if inner.trim().is_empty() {
		return Ok(Vec::new());
	}

	inner
		.split(',')
		.map(|part| {
			part.trim().parse::<f32>().map_err(|_| {
				Error::CorruptRow("Vector text contains a non-numeric value.".to_string())
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pg_vector_text_round_trips() {
		let text = vector_to_pg(&[0.5, -1.0, 2.25]);

		assert_eq!(text, "[0.5,-1,2.25]");
		assert_eq!(parse_pg_vector(&text).expect("parse failed"), vec![0.5, -1.0, 2.25]);
	}

	#[test]
	fn rejects_unbracketed_vector_text() {
		assert!(matches!(parse_pg_vector("0.5,1.0"), Err(Error::CorruptRow(_))));
	}

	#[test]
	fn unusable_embeddings_are_rejected() {
		assert!(check_embedding(&[0.5, 1.0], 2).is_ok());
		assert!(check_embedding(&[1e20, 0.0], 2).is_ok());
		assert!(matches!(
			check_embedding(&[1.0], 2),
			Err(Error::DimensionMismatch { expected: 2, actual: 1 })
		));

		for embedding in [[f32::NAN, 0.0], [f32::INFINITY, 0.0], [0.0, 0.0], [f32::MAX, f32::MAX]] {
			assert!(matches!(check_embedding(&embedding, 2), Err(Error::InvalidArgument(_))));
		}
	}

	#[test]
	fn empty_vector_text_is_empty() {
		assert!(parse_pg_vector("[]").expect("parse failed").is_empty());
	}
}
