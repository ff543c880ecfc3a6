use super::views::{
    home_view, load_category, load_details, load_search, load_watch, CategoryView, DetailsView,
    HomeView, SearchView, WatchView,
};
use super::{Page, PageContext, PageError, PageState};
use crate::provider::CatalogProvider;
use crate::routes::Route;
use anyhow::anyhow;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Home(HomeView),
    Movie(DetailsView),
    Category(CategoryView),
    Search(SearchView),
    Watch(WatchView),
}

/// Load whatever `route` shows. Home waits for the provider's single load
/// cycle instead of fetching on its own.
pub async fn render(
    ctx: &PageContext,
    provider: &CatalogProvider,
    route: &Route,
) -> Result<View, PageError> {
    match route {
        Route::Home => {
            provider.load().await;
            match home_view(&provider.snapshot(), &ctx.images) {
                PageState::Ready(home) => Ok(View::Home(home)),
                PageState::Failed(msg) => Err(PageError::Fetch(anyhow!(msg))),
                PageState::Loading => Err(PageError::Fetch(anyhow!("catalog still loading"))),
            }
        }
        Route::Movie(id) => Ok(View::Movie(load_details(ctx, *id).await?)),
        Route::Watch(id) => Ok(View::Watch(load_watch(ctx, *id).await?)),
        Route::Category { key, sort } => Ok(View::Category(load_category(ctx, *key, *sort).await?)),
        Route::Search(query) => Ok(View::Search(load_search(ctx, query).await?)),
    }
}

/// One browsing session: the shared catalog provider plus the page on screen.
pub struct Navigator {
    ctx: PageContext,
    provider: Arc<CatalogProvider>,
    current: Option<Route>,
    page: Page<View>,
}

impl Navigator {
    pub fn new(ctx: PageContext, provider: Arc<CatalogProvider>) -> Self {
        Self {
            ctx,
            provider,
            current: None,
            page: Page::new(),
        }
    }

    /// Show `route`, abandoning the fetch of the page being left.
    pub fn navigate(&mut self, route: Route) {
        info!("Navigating to {}", route);
        let ctx = self.ctx.clone();
        let provider = self.provider.clone();
        let kind = route.page_kind();
        self.current = Some(route.clone());
        self.page.load(kind, async move {
            render(&ctx, &provider, &route).await
        });
    }

    /// Parse and navigate to a browser path. Returns false for unknown paths.
    pub fn navigate_path(&mut self, path: &str) -> bool {
        match Route::parse(path) {
            Some(route) => {
                self.navigate(route);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&Route> {
        self.current.as_ref()
    }

    pub fn state(&self) -> PageState<View> {
        self.page.state()
    }

    pub async fn settled(&self) -> PageState<View> {
        self.page.settled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockCatalog;

    fn navigator() -> Navigator {
        let api = Arc::new(MockCatalog::new());
        let provider = Arc::new(CatalogProvider::new(api.clone()));
        Navigator::new(PageContext::new(api), provider)
    }

    #[tokio::test]
    async fn home_waits_for_provider() {
        let mut nav = navigator();
        nav.navigate(Route::Home);
        match nav.settled().await {
            PageState::Ready(View::Home(home)) => assert_eq!(home.rows.len(), 3),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_movie_shows_not_found() {
        let mut nav = navigator();
        assert!(nav.navigate_path("/movie/77"));
        assert_eq!(
            nav.settled().await,
            PageState::Failed(crate::pages::NOT_FOUND_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn last_navigation_wins() {
        let mut nav = navigator();
        nav.navigate_path("/movie/1");
        nav.navigate_path("/search?q=godfather");
        assert_eq!(nav.current(), Some(&Route::Search("godfather".to_string())));
        match nav.settled().await {
            PageState::Ready(View::Search(view)) => {
                assert_eq!(view.movies.len(), 1);
                assert_eq!(view.movies[0].movie.id, 3);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn unknown_path_is_rejected() {
        let mut nav = navigator();
        assert!(!nav.navigate_path("/settings"));
        assert!(nav.current().is_none());
    }

    #[tokio::test]
    async fn view_serializes_with_view_tag() {
        let mut nav = navigator();
        nav.navigate_path("/category/popular");
        let state = nav.settled().await;
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["data"]["view"], "category");
        assert_eq!(json["data"]["title"], "Popular Movies");
    }
}
