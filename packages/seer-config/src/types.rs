use serde::Deserialize;
use serde_json::{Map, Value};

pub const INDEX_BACKENDS: [&str; 2] = ["qdrant", "memory"];
pub const SEARCH_STRATEGIES: [&str; 2] = ["grouped", "flat"];
pub const IMAGE_SOURCES: [&str; 3] = ["media_proxy", "url", "media_url"];

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub display: Display,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub index: Index,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Index {
	/// One of "qdrant" or "memory". The memory backend answers exact queries in process.
	pub backend: String,
	#[serde(default)]
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// "grouped" asks the index for each owner's best hits directly. "flat" runs one top-K
	/// query and groups client-side, which can miss an owner whose best item falls outside K.
	pub strategy: String,
	/// Hits fetched per owner so equal scores can be tie-broken by insertion order.
	pub group_size: u32,
	pub flat_k_multiplier: u32,
	pub flat_k_min: u32,
	pub max_owners: u32,
	/// Owners reported by a search response. The overlay always keeps every match.
	pub result_limit: u32,
	pub max_image_bytes: usize,
	/// Open sessions kept at once. Creating one more evicts the least recently used.
	pub max_sessions: usize,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			strategy: "grouped".to_string(),
			group_size: 3,
			flat_k_multiplier: 10,
			flat_k_min: 100,
			max_owners: 1_000,
			result_limit: 10,
			max_image_bytes: 10 * 1_024 * 1_024,
			max_sessions: 10_000,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Display {
	/// Ordered image sources; the first one an item can satisfy wins.
	pub image_precedence: Vec<String>,
	pub proxy_path_template: String,
}
impl Default for Display {
	fn default() -> Self {
		Self {
			image_precedence: IMAGE_SOURCES.iter().map(|source| source.to_string()).collect(),
			proxy_path_template: "/api/images/{media_id}/proxy".to_string(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
	pub api_auth_token: Option<String>,
	pub admin_auth_token: Option<String>,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true, api_auth_token: None, admin_auth_token: None }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}
