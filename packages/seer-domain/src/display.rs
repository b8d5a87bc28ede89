use crate::item::ItemMeta;

const MEDIA_ID_PLACEHOLDER: &str = "{media_id}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
	/// Served through the local proxy, keyed by the upstream media id.
	MediaProxy,
	Url,
	MediaUrl,
}
impl ImageSource {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"media_proxy" => Some(Self::MediaProxy),
			"url" => Some(Self::Url),
			"media_url" => Some(Self::MediaUrl),
			_ => None,
		}
	}
}

/// Ordered policy for picking the one image a display record shows. Evaluated once per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePrecedence {
	sources: Vec<ImageSource>,
	proxy_path_template: String,
}
impl ImagePrecedence {
	pub fn new(sources: Vec<ImageSource>, proxy_path_template: impl Into<String>) -> Self {
		Self { sources, proxy_path_template: proxy_path_template.into() }
	}

	/// Builds the policy from validated configuration. Unknown names are skipped.
	pub fn from_config(cfg: &seer_config::Display) -> Self {
		let sources =
			cfg.image_precedence.iter().filter_map(|name| ImageSource::parse(name)).collect();

		Self::new(sources, cfg.proxy_path_template.clone())
	}

	pub fn sources(&self) -> &[ImageSource] {
		&self.sources
	}

	pub fn resolve(&self, meta: &ItemMeta) -> Option<String> {
		self.sources.iter().find_map(|source| self.candidate(*source, meta))
	}

	fn candidate(&self, source: ImageSource, meta: &ItemMeta) -> Option<String> {
		let present = |value: &Option<String>| {
			value.as_deref().map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
		};

		match source {
			ImageSource::MediaProxy => present(&meta.media_id)
				.map(|media_id| self.proxy_path_template.replace(MEDIA_ID_PLACEHOLDER, &media_id)),
			ImageSource::Url => present(&meta.url),
			ImageSource::MediaUrl => present(&meta.media_url),
		}
	}
}
impl Default for ImagePrecedence {
	fn default() -> Self {
		Self::from_config(&seer_config::Display::default())
	}
}
