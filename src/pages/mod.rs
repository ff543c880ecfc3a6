//! Page-level view models and their loaders.
//!
//! Every page fetches its own data with the same contract as the catalog
//! provider: `Loading` until the fetch settles, then either `Ready` with the
//! whole view or `Failed` with a fixed message. Nothing is retried.
use crate::catalog::{CatalogApi, ImageResolver};
use crate::player::PlayerSettings;
use crate::provider::LOAD_ERROR_MESSAGE;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

mod navigator;
mod slot;
mod views;

pub use navigator::{render, Navigator, View};
pub use slot::Page;
pub use views::{
    home_view, load_category, load_details, load_search, load_watch, CategoryView, DetailsView,
    HomeView, MovieCard, MovieRow, SearchOutcome, SearchView, SortOrder, WatchView,
};

pub const NOT_FOUND_MESSAGE: &str = "Movie not found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Home,
    Details,
    Category,
    Search,
    Watch,
}

impl PageKind {
    pub fn failure_message(self) -> &'static str {
        match self {
            PageKind::Home => LOAD_ERROR_MESSAGE,
            PageKind::Details => "Failed to load movie details. Please try again later.",
            PageKind::Category => "Failed to fetch movies. Please try again later.",
            PageKind::Search => "Failed to search movies. Please try again later.",
            PageKind::Watch => "Failed to load movie. Please try again later.",
        }
    }
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("movie {0} not found")]
    NotFound(i32),
    #[error("catalog fetch failed: {0:#}")]
    Fetch(#[from] anyhow::Error),
}

impl PageError {
    /// The static text shown to users; the underlying cause only goes to logs.
    pub fn user_message(&self, kind: PageKind) -> &'static str {
        match self {
            PageError::NotFound(_) => NOT_FOUND_MESSAGE,
            PageError::Fetch(_) => kind.failure_message(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PageError::NotFound(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum PageState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> PageState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Everything a page needs to load, injected once per session.
#[derive(Clone)]
pub struct PageContext {
    pub api: Arc<dyn CatalogApi>,
    pub images: ImageResolver,
    pub stream_url: String,
    pub player: PlayerSettings,
}

impl PageContext {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            images: ImageResolver::default(),
            stream_url: crate::config::DEFAULT_STREAM_URL.to_string(),
            player: PlayerSettings::default(),
        }
    }
}
