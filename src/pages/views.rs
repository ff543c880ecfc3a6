use super::{PageContext, PageError, PageState};
use crate::catalog::{CategoryKey, Collection, ImageResolver, ImageSize};
use crate::models::{Genre, MovieDetails, MovieSummary, VideoRef};
use crate::player::PlayerSettings;
use crate::provider::CatalogSnapshot;
use crate::routes::Route;
use crate::utils::{rating_label, release_label, release_year, runtime_label};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

/// A movie as it appears in a grid or row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCard {
    #[serde(flatten)]
    pub movie: MovieSummary,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub rating: String,
    pub year: Option<String>,
    pub href: String,
}

impl MovieCard {
    pub fn new(movie: MovieSummary, images: &ImageResolver) -> Self {
        Self {
            poster_url: images.resolve(movie.poster_path.as_deref(), Some(ImageSize::W500)),
            backdrop_url: images.resolve(movie.backdrop_path.as_deref(), None),
            rating: rating_label(movie.vote_average),
            year: release_year(movie.release_date),
            href: Route::Movie(movie.id).to_string(),
            movie,
        }
    }
}

fn cards(movies: Vec<MovieSummary>, images: &ImageResolver) -> Vec<MovieCard> {
    movies
        .into_iter()
        .map(|m| MovieCard::new(m, images))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRow {
    pub title: String,
    pub collection: Collection,
    pub href: String,
    pub movies: Vec<MovieCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub featured: Option<MovieCard>,
    pub rows: Vec<MovieRow>,
    pub genres: Vec<Genre>,
}

/// Build the home page from the shared catalog snapshot.
pub fn home_view(snapshot: &CatalogSnapshot, images: &ImageResolver) -> PageState<HomeView> {
    if snapshot.loading {
        return PageState::Loading;
    }
    if let Some(err) = &snapshot.error {
        return PageState::Failed(err.clone());
    }
    let row = |title: &str, collection: Collection, movies: &[MovieSummary]| MovieRow {
        title: title.to_string(),
        collection,
        href: Route::Category {
            key: CategoryKey::Collection(collection),
            sort: SortOrder::default(),
        }
        .to_string(),
        movies: cards(movies.to_vec(), images),
    };
    PageState::Ready(HomeView {
        featured: snapshot
            .popular
            .first()
            .cloned()
            .map(|m| MovieCard::new(m, images)),
        rows: vec![
            row("Popular Movies", Collection::Popular, &snapshot.popular),
            row("Top Rated", Collection::TopRated, &snapshot.top_rated),
            row("Coming Soon", Collection::Upcoming, &snapshot.upcoming),
        ],
        genres: snapshot.genres.clone(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsView {
    #[serde(flatten)]
    pub details: MovieDetails,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub rating: String,
    pub runtime_label: Option<String>,
    pub release_label: Option<String>,
    pub trailer: Option<VideoRef>,
    pub watch_href: String,
    pub similar_cards: Vec<MovieCard>,
}

impl DetailsView {
    pub fn new(details: MovieDetails, images: &ImageResolver) -> Self {
        let summary = &details.summary;
        Self {
            poster_url: images.resolve(summary.poster_path.as_deref(), Some(ImageSize::W500)),
            backdrop_url: images.resolve(summary.backdrop_path.as_deref(), None),
            rating: rating_label(summary.vote_average),
            runtime_label: runtime_label(details.runtime),
            release_label: release_label(summary.release_date),
            trailer: details.trailer().cloned(),
            watch_href: Route::Watch(summary.id).to_string(),
            similar_cards: cards(details.similar.clone(), images),
            details,
        }
    }
}

pub async fn load_details(ctx: &PageContext, id: i32) -> Result<DetailsView, PageError> {
    debug!(id, "Loading movie details");
    let details = ctx
        .api
        .fetch_details(id)
        .await?
        .ok_or(PageError::NotFound(id))?;
    Ok(DetailsView::new(details, &ctx.images))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchView {
    pub movie: DetailsView,
    pub stream_url: String,
    pub player: PlayerSettings,
}

pub async fn load_watch(ctx: &PageContext, id: i32) -> Result<WatchView, PageError> {
    let movie = load_details(ctx, id).await?;
    Ok(WatchView {
        movie,
        stream_url: ctx.stream_url.clone(),
        player: ctx.player,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Highest rated first.
    #[default]
    Popularity,
    /// Newest first; undated movies last.
    ReleaseDate,
    Title,
}

impl SortOrder {
    pub fn key(self) -> &'static str {
        match self {
            SortOrder::Popularity => "popularity",
            SortOrder::ReleaseDate => "release_date",
            SortOrder::Title => "title",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "popularity" => Some(SortOrder::Popularity),
            "release_date" => Some(SortOrder::ReleaseDate),
            "title" => Some(SortOrder::Title),
            _ => None,
        }
    }

    pub fn sort(self, movies: &mut [MovieSummary]) {
        match self {
            SortOrder::Popularity => {
                movies.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average))
            }
            SortOrder::ReleaseDate => movies.sort_by(|a, b| match (a.release_date, b.release_date) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }),
            SortOrder::Title => movies.sort_by_key(|m| m.title.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    pub key: CategoryKey,
    pub title: String,
    pub sort: SortOrder,
    pub movies: Vec<MovieCard>,
}

pub async fn load_category(
    ctx: &PageContext,
    key: CategoryKey,
    sort: SortOrder,
) -> Result<CategoryView, PageError> {
    debug!(%key, sort = sort.key(), "Loading category");
    let (mut movies, title) = match key {
        CategoryKey::Collection(c) => (c.fetch(ctx.api.as_ref()).await?, c.title().to_string()),
        CategoryKey::Genre(id) => {
            let (movies, genres) =
                tokio::try_join!(ctx.api.fetch_by_genre(id), ctx.api.fetch_genres())?;
            let title = genres
                .iter()
                .find(|g| g.id == id)
                .map(|g| format!("{} Movies", g.name))
                .unwrap_or_else(|| "Movies".to_string());
            (movies, title)
        }
    };
    sort.sort(&mut movies);
    Ok(CategoryView {
        key,
        title,
        sort,
        movies: cards(movies, &ctx.images),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    /// No query entered; nothing was fetched.
    EmptyQuery,
    /// The search ran and matched nothing. Not an error.
    NoResults,
    Found,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchView {
    pub query: String,
    pub outcome: SearchOutcome,
    pub movies: Vec<MovieCard>,
}

pub async fn load_search(ctx: &PageContext, query: &str) -> Result<SearchView, PageError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchView {
            query: String::new(),
            outcome: SearchOutcome::EmptyQuery,
            movies: Vec::new(),
        });
    }
    let movies = ctx.api.search(query).await?;
    debug!(query, results = movies.len(), "Search finished");
    let outcome = if movies.is_empty() {
        SearchOutcome::NoResults
    } else {
        SearchOutcome::Found
    };
    Ok(SearchView {
        query: query.to_string(),
        outcome,
        movies: cards(movies, &ctx.images),
    })
}
