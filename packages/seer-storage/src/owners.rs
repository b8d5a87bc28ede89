use std::collections::{BTreeMap, BTreeSet};

use sqlx::PgPool;
use uuid::Uuid;

use seer_domain::{ItemMeta, Location, Owner, PriceKind};

use crate::{Result, models::OwnerRow};

/// Reads the full owner population, most recently updated first.
pub async fn load_owners(pool: &PgPool) -> Result<Vec<Owner>> {
	let rows: Vec<OwnerRow> = sqlx::query_as(
		"\
SELECT
	o.owner_id,
	o.username,
	o.location,
	o.arrival_locations,
	o.price_hairstyle_bride,
	o.price_hairstyle_bridesmaid,
	o.price_makeup_bride,
	o.price_makeup_bridesmaid,
	o.price_hairstyle_makeup_combo,
	o.min_price,
	o.max_price,
	o.updated_at,
	s.media_id AS sample_media_id,
	s.url AS sample_url,
	s.media_url AS sample_media_url,
	s.caption AS sample_caption,
	s.width AS sample_width,
	s.height AS sample_height
FROM owners o
LEFT JOIN items s ON s.item_id = o.sample_item_id
ORDER BY o.updated_at DESC NULLS LAST, o.owner_id",
	)
	.fetch_all(pool)
	.await?;

	Ok(rows.into_iter().map(owner_from_row).collect())
}

/// Inserts or overwrites an owner's attributes. `sample_item_id` is left untouched on update.
pub async fn upsert_owner(pool: &PgPool, owner: &Owner) -> Result<()> {
	let arrival_locations: Vec<String> =
		owner.arrival_locations.iter().map(|location| location.label().to_string()).collect();
	let price = |kind: PriceKind| owner.prices.get(&kind).copied();

	sqlx::query(
		"\
INSERT INTO owners (
	owner_id,
	username,
	location,
	arrival_locations,
	price_hairstyle_bride,
	price_hairstyle_bridesmaid,
	price_makeup_bride,
	price_makeup_bridesmaid,
	price_hairstyle_makeup_combo,
	min_price,
	max_price,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
ON CONFLICT (owner_id) DO UPDATE
SET
	username = EXCLUDED.username,
	location = EXCLUDED.location,
	arrival_locations = EXCLUDED.arrival_locations,
	price_hairstyle_bride = EXCLUDED.price_hairstyle_bride,
	price_hairstyle_bridesmaid = EXCLUDED.price_hairstyle_bridesmaid,
	price_makeup_bride = EXCLUDED.price_makeup_bride,
	price_makeup_bridesmaid = EXCLUDED.price_makeup_bridesmaid,
	price_hairstyle_makeup_combo = EXCLUDED.price_hairstyle_makeup_combo,
	min_price = EXCLUDED.min_price,
	max_price = EXCLUDED.max_price,
	updated_at = EXCLUDED.updated_at",
	)
	.bind(&owner.owner_id)
	.bind(&owner.username)
	.bind(owner.location.as_ref().map(|location| location.label().to_string()))
	.bind(arrival_locations)
	.bind(price(PriceKind::HairstyleBride))
	.bind(price(PriceKind::HairstyleBridesmaid))
	.bind(price(PriceKind::MakeupBride))
	.bind(price(PriceKind::MakeupBridesmaid))
	.bind(price(PriceKind::HairstyleMakeupCombo))
	.bind(price(PriceKind::Min))
	.bind(price(PriceKind::Max))
	.bind(owner.updated_at)
	.execute(pool)
	.await?;

	Ok(())
}

pub async fn set_sample_item(pool: &PgPool, owner_id: &str, item_id: Uuid) -> Result<()> {
	sqlx::query("UPDATE owners SET sample_item_id = $2 WHERE owner_id = $1")
		.bind(owner_id)
		.bind(item_id)
		.execute(pool)
		.await?;

	Ok(())
}

pub fn owner_from_row(row: OwnerRow) -> Owner {
	let arrival_locations: BTreeSet<Location> =
		row.arrival_locations.iter().flat_map(|raw| Location::parse_list(raw)).collect();
	let mut prices = BTreeMap::new();

	for (kind, value) in [
		(PriceKind::HairstyleBride, row.price_hairstyle_bride),
		(PriceKind::HairstyleBridesmaid, row.price_hairstyle_bridesmaid),
		(PriceKind::MakeupBride, row.price_makeup_bride),
		(PriceKind::MakeupBridesmaid, row.price_makeup_bridesmaid),
		(PriceKind::HairstyleMakeupCombo, row.price_hairstyle_makeup_combo),
		(PriceKind::Min, row.min_price),
		(PriceKind::Max, row.max_price),
	] {
		if let Some(value) = value {
			prices.insert(kind, value);
		}
	}

	let sample = ItemMeta {
		media_id: row.sample_media_id,
		url: row.sample_url,
		media_url: row.sample_media_url,
		caption: row.sample_caption,
		width: row.sample_width,
		height: row.sample_height,
	};
	let sample_image = (sample != ItemMeta::default()).then_some(sample);

	Owner {
		owner_id: row.owner_id,
		username: row.username,
		location: row.location.as_deref().and_then(Location::new),
		arrival_locations,
		prices,
		updated_at: row.updated_at,
		sample_image,
	}
}
