use crate::catalog::CategoryKey;
use crate::config::Config;
use crate::pages::{render, PageContext, PageError, PageState, SortOrder};
use crate::provider::CatalogProvider;
use crate::routes::Route;
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub ctx: PageContext,
    pub provider: Arc<CatalogProvider>,
}

impl AppState {
    pub fn new(ctx: PageContext) -> Self {
        let provider = Arc::new(CatalogProvider::new(ctx.api.clone()));
        Self { ctx, provider }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let api = config.build_catalog()?;
    let ctx = config.page_context(api.clone());
    let provider = CatalogProvider::mount(api).await;
    if let Some(err) = provider.error() {
        warn!("Starting with an empty catalog: {}", err);
    }

    let app = build_router(AppState { ctx, provider });

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/home", get(home))
        .route("/api/movie/:id", get(movie))
        .route("/api/watch/:id", get(watch))
        .route("/api/category/:key", get(category))
        .route("/api/search", get(search))
        .route("/api/view", get(view))
        .fallback(unknown_route)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Default, Deserialize)]
struct SortParams {
    sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
struct ViewParams {
    path: Option<String>,
}

async fn home(State(state): State<AppState>) -> Response {
    respond(&state, Some(Route::Home)).await
}

async fn movie(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(&state, id.parse().ok().map(Route::Movie)).await
}

async fn watch(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(&state, id.parse().ok().map(Route::Watch)).await
}

async fn category(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<SortParams>,
) -> Response {
    let sort = params
        .sort
        .as_deref()
        .and_then(SortOrder::parse)
        .unwrap_or_default();
    let route = CategoryKey::parse(&key).map(|key| Route::Category { key, sort });
    respond(&state, route).await
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    respond(&state, Some(Route::Search(params.q))).await
}

async fn view(State(state): State<AppState>, Query(params): Query<ViewParams>) -> Response {
    let route = params.path.as_deref().and_then(Route::parse);
    respond(&state, route).await
}

async fn unknown_route() -> Response {
    error_response(StatusCode::NOT_FOUND, "Page not found.")
}

async fn respond(state: &AppState, route: Option<Route>) -> Response {
    let Some(route) = route else {
        return unknown_route().await;
    };
    debug!("Rendering {}", route);
    match render(&state.ctx, &state.provider, &route).await {
        Ok(view) => Json(PageState::Ready(view)).into_response(),
        Err(e) => {
            let kind = route.page_kind();
            let status = status_for(&e);
            if e.is_not_found() {
                debug!("{} -> {}", route, e);
            } else {
                warn!("Failed to render {}: {}", route, e);
            }
            error_response(status, e.user_message(kind))
        }
    }
}

fn status_for(err: &PageError) -> StatusCode {
    match err {
        PageError::NotFound(_) => StatusCode::NOT_FOUND,
        PageError::Fetch(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "status": "error", "message": message }))).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
