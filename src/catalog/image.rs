use serde::Serialize;

pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    W200,
    W500,
    #[default]
    Original,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::W200 => "w200",
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        }
    }
}

/// Builds display URLs for catalog image paths against a configurable base.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    base: String,
}

impl ImageResolver {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn resolve(&self, path: Option<&str>, size: Option<ImageSize>) -> Option<String> {
        let path = path.filter(|p| !p.is_empty())?;
        let size = size.unwrap_or_default();
        Some(format!("{}/{}{}", self.base, size.as_str(), path))
    }
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(TMDB_IMAGE_BASE)
    }
}

/// Resolve against the public TMDB image host.
pub fn image_url(path: Option<&str>, size: Option<ImageSize>) -> Option<String> {
    ImageResolver::default().resolve(path, size)
}
