use crate::catalog::{CatalogApi, ImageResolver, MockCatalog, TmdbCatalog, TMDB_IMAGE_BASE};
use crate::pages::PageContext;
use crate::player::{PlayerSettings, DEFAULT_HIDE_DELAY_MS, DEFAULT_SKIP_SECONDS};
use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_STREAM_URL: &str =
    "https://sample-videos.com/video123/mp4/720/big_buck_bunny_720p_1mb.mp4";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3146";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Mock,
    Tmdb,
}

impl FromStr for CatalogSource {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(CatalogSource::Mock),
            "tmdb" => Ok(CatalogSource::Tmdb),
            other => Err(anyhow!("CATALOG_SOURCE must be 'mock' or 'tmdb', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: CatalogSource,
    pub tmdb_api_key: Option<String>,
    pub image_base_url: String,
    pub stream_url: String,
    pub bind_addr: SocketAddr,
    pub player: PlayerSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = match get("CATALOG_SOURCE") {
            Some(raw) => raw.parse()?,
            None => CatalogSource::Mock,
        };
        let tmdb_api_key = get("TMDB_API_KEY");
        if source == CatalogSource::Tmdb && tmdb_api_key.is_none() {
            bail!("Missing required environment variable: TMDB_API_KEY");
        }

        let bind_addr: SocketAddr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR is not a valid socket address")?;

        let hide_delay_ms: u64 = match get("CONTROLS_HIDE_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("CONTROLS_HIDE_MS must be a whole number of milliseconds")?,
            None => DEFAULT_HIDE_DELAY_MS,
        };
        let skip_seconds: f64 = match get("SKIP_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("SKIP_SECONDS must be a number")?,
            None => DEFAULT_SKIP_SECONDS,
        };
        if !(skip_seconds.is_finite() && skip_seconds > 0.0) {
            bail!("SKIP_SECONDS must be positive");
        }

        Ok(Self {
            source,
            tmdb_api_key,
            image_base_url: get("IMAGE_BASE_URL").unwrap_or_else(|| TMDB_IMAGE_BASE.to_string()),
            stream_url: get("STREAM_URL").unwrap_or_else(|| DEFAULT_STREAM_URL.to_string()),
            bind_addr,
            player: PlayerSettings {
                hide_delay_ms,
                skip_seconds,
            },
        })
    }

    pub fn build_catalog(&self) -> Result<Arc<dyn CatalogApi>> {
        match self.source {
            CatalogSource::Mock => {
                info!("Using in-memory mock catalog");
                Ok(Arc::new(MockCatalog::new()))
            }
            CatalogSource::Tmdb => {
                let key = self
                    .tmdb_api_key
                    .clone()
                    .ok_or_else(|| anyhow!("TMDB_API_KEY not set"))?;
                info!("Using TMDB catalog");
                Ok(Arc::new(TmdbCatalog::new(key)))
            }
        }
    }

    pub fn page_context(&self, api: Arc<dyn CatalogApi>) -> PageContext {
        PageContext {
            api,
            images: ImageResolver::new(self.image_base_url.clone()),
            stream_url: self.stream_url.clone(),
            player: self.player,
        }
    }
}
