use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

mod image;
mod mock;
mod tmdb;

pub use image::{image_url, ImageResolver, ImageSize, TMDB_IMAGE_BASE};
pub use mock::MockCatalog;
pub use tmdb::TmdbCatalog;

use crate::models::{Genre, MovieDetails, MovieSummary};

/// Read side of the movie catalog. Implementations must be interchangeable:
/// the views never know whether data comes from memory or the network.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>>;
    async fn fetch_top_rated(&self) -> Result<Vec<MovieSummary>>;
    async fn fetch_upcoming(&self) -> Result<Vec<MovieSummary>>;
    async fn fetch_genres(&self) -> Result<Vec<Genre>>;
    /// `Ok(None)` when no movie has this id.
    async fn fetch_details(&self, id: i32) -> Result<Option<MovieDetails>>;
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>>;
    async fn fetch_by_genre(&self, genre_id: i32) -> Result<Vec<MovieSummary>>;
}

/// The three curated movie lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Popular,
    TopRated,
    Upcoming,
}

impl Collection {
    pub fn key(self) -> &'static str {
        match self {
            Collection::Popular => "popular",
            Collection::TopRated => "top_rated",
            Collection::Upcoming => "upcoming",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "popular" => Some(Collection::Popular),
            "top_rated" => Some(Collection::TopRated),
            "upcoming" => Some(Collection::Upcoming),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Collection::Popular => "Popular Movies",
            Collection::TopRated => "Top Rated Movies",
            Collection::Upcoming => "Upcoming Movies",
        }
    }

    pub async fn fetch(self, api: &dyn CatalogApi) -> Result<Vec<MovieSummary>> {
        match self {
            Collection::Popular => api.fetch_popular().await,
            Collection::TopRated => api.fetch_top_rated().await,
            Collection::Upcoming => api.fetch_upcoming().await,
        }
    }
}

/// What a category listing is keyed by: a curated collection or a genre id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    Collection(Collection),
    Genre(i32),
}

impl CategoryKey {
    pub fn parse(key: &str) -> Option<Self> {
        if let Some(c) = Collection::from_key(key) {
            return Some(CategoryKey::Collection(c));
        }
        key.parse::<i32>().ok().map(CategoryKey::Genre)
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKey::Collection(c) => f.write_str(c.key()),
            CategoryKey::Genre(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for CategoryKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
