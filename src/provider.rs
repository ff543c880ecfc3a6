//! Session-wide catalog state: the three curated collections and the genre
//! table, loaded together exactly once.
//!
//! The load is all-or-nothing. Consumers either see every collection or none
//! of them, never a mix from a half-finished cycle.
use crate::catalog::CatalogApi;
use crate::models::{Genre, MovieSummary};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, OnceCell};
use tracing::{error, info};

pub const LOAD_ERROR_MESSAGE: &str = "Failed to fetch movie data. Please try again later.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub popular: Vec<MovieSummary>,
    pub top_rated: Vec<MovieSummary>,
    pub upcoming: Vec<MovieSummary>,
    pub genres: Vec<Genre>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CatalogSnapshot {
    fn loading() -> Self {
        Self {
            popular: Vec::new(),
            top_rated: Vec::new(),
            upcoming: Vec::new(),
            genres: Vec::new(),
            loading: true,
            error: None,
        }
    }

    fn failed() -> Self {
        Self {
            loading: false,
            error: Some(LOAD_ERROR_MESSAGE.to_string()),
            ..Self::loading()
        }
    }

    pub fn genre_name(&self, id: i32) -> Option<&str> {
        self.genres
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.as_str())
    }
}

pub struct CatalogProvider {
    api: Arc<dyn CatalogApi>,
    state: watch::Sender<CatalogSnapshot>,
    loaded: OnceCell<()>,
}

impl CatalogProvider {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        let (state, _) = watch::channel(CatalogSnapshot::loading());
        Self {
            api,
            state,
            loaded: OnceCell::new(),
        }
    }

    /// Construct and run the initial load before handing the provider out.
    pub async fn mount(api: Arc<dyn CatalogApi>) -> Arc<Self> {
        let provider = Arc::new(Self::new(api));
        provider.load().await;
        provider
    }

    /// Runs the load cycle once. Later and concurrent callers wait for that
    /// same cycle; nothing is ever refetched.
    pub async fn load(&self) {
        self.loaded.get_or_init(|| self.fetch_all()).await;
    }

    async fn fetch_all(&self) {
        info!("Loading catalog collections");
        let api = self.api.as_ref();
        let result = tokio::try_join!(
            api.fetch_popular(),
            api.fetch_top_rated(),
            api.fetch_upcoming(),
            api.fetch_genres(),
        );
        let next = match result {
            Ok((popular, top_rated, upcoming, genres)) => {
                info!(
                    popular = popular.len(),
                    top_rated = top_rated.len(),
                    upcoming = upcoming.len(),
                    genres = genres.len(),
                    "Catalog loaded"
                );
                CatalogSnapshot {
                    popular,
                    top_rated,
                    upcoming,
                    genres,
                    loading: false,
                    error: None,
                }
            }
            Err(e) => {
                error!("Error fetching initial movie data: {:#}", e);
                CatalogSnapshot::failed()
            }
        };
        self.state.send_replace(next);
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn popular(&self) -> Vec<MovieSummary> {
        self.state.borrow().popular.clone()
    }

    pub fn top_rated(&self) -> Vec<MovieSummary> {
        self.state.borrow().top_rated.clone()
    }

    pub fn upcoming(&self) -> Vec<MovieSummary> {
        self.state.borrow().upcoming.clone()
    }

    pub fn genres(&self) -> Vec<Genre> {
        self.state.borrow().genres.clone()
    }

    pub fn genre_name(&self, id: i32) -> Option<String> {
        self.state.borrow().genre_name(id).map(str::to_string)
    }
}
