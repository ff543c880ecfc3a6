use super::CatalogApi;
use crate::models::{CastMember, Genre, MovieDetails, MovieSummary, VideoRef};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

const TMDB_BASE: &str = "https://api.themoviedb.org/3";
const MAX_CAST: usize = 10;
const MAX_SIMILAR: usize = 6;

/// Catalog backed by the TMDB v3 REST API.
#[derive(Debug, Clone)]
pub struct TmdbCatalog {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbCatalog {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: TMDB_BASE.to_string(),
        }
    }

    /// Point the client at another host (a proxy or a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_list(&self, path: &str, extra: &str) -> Result<Vec<MovieSummary>> {
        let url = format!(
            "{}{path}?language=en-US&page=1{extra}&api_key={}",
            self.base_url, self.api_key
        );
        let page: Page = self
            .get_json(&url)
            .await?
            .ok_or_else(|| anyhow!("{path} returned 404"))?;
        Ok(page.results.into_iter().map(MovieSummary::from).collect())
    }

    /// `Ok(None)` on 404 so callers can tell a missing record from a failed request.
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<Option<T>> {
        debug!(path = %url.split('?').next().unwrap_or(url), "TMDB request");
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("request failed")?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let text = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("TMDB responded {}: {}", status, text));
        }
        let parsed: T = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(Some(parsed))
    }
}

#[async_trait]
impl CatalogApi for TmdbCatalog {
    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>> {
        self.fetch_list("/movie/popular", "").await
    }

    async fn fetch_top_rated(&self) -> Result<Vec<MovieSummary>> {
        self.fetch_list("/movie/top_rated", "").await
    }

    async fn fetch_upcoming(&self) -> Result<Vec<MovieSummary>> {
        self.fetch_list("/movie/upcoming", "").await
    }

    async fn fetch_genres(&self) -> Result<Vec<Genre>> {
        #[derive(Deserialize)]
        struct GenreList {
            genres: Vec<Genre>,
        }

        let url = format!(
            "{}/genre/movie/list?language=en-US&api_key={}",
            self.base_url, self.api_key
        );
        let list: GenreList = self
            .get_json(&url)
            .await?
            .ok_or_else(|| anyhow!("genre list returned 404"))?;
        Ok(list.genres)
    }

    async fn fetch_details(&self, id: i32) -> Result<Option<MovieDetails>> {
        let url = format!(
            "{}/movie/{id}?append_to_response=credits,similar,videos&language=en-US&api_key={}",
            self.base_url, self.api_key
        );
        let detail: Option<MovieAppended> = self.get_json(&url).await?;
        Ok(detail.map(MovieDetails::from))
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>> {
        let extra = format!("&query={}", urlencoding::encode(query));
        self.fetch_list("/search/movie", &extra).await
    }

    async fn fetch_by_genre(&self, genre_id: i32) -> Result<Vec<MovieSummary>> {
        let extra = format!("&with_genres={genre_id}&sort_by=popularity.desc");
        self.fetch_list("/discover/movie", &extra).await
    }
}

#[derive(Debug, Deserialize)]
struct Page {
    results: Vec<MovieResult>,
}

#[derive(Debug, Deserialize)]
struct MovieResult {
    id: i32,
    title: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    overview: String,
    release_date: Option<String>,
    #[serde(default)]
    vote_average: f32,
    #[serde(default)]
    genre_ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct Credits {
    cast: Vec<CreditCast>,
}

#[derive(Debug, Deserialize)]
struct CreditCast {
    id: i32,
    name: String,
    #[serde(default)]
    character: String,
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Videos {
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    key: String,
    name: String,
    site: String,
    #[serde(rename = "type")]
    video_type: String,
}

#[derive(Debug, Deserialize)]
struct MovieAppended {
    id: i32,
    title: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    overview: String,
    release_date: Option<String>,
    #[serde(default)]
    vote_average: f32,
    #[serde(default)]
    genres: Vec<Genre>,
    runtime: Option<u32>,
    tagline: Option<String>,
    credits: Credits,
    similar: Page,
    videos: Videos,
}

impl From<MovieResult> for MovieSummary {
    fn from(m: MovieResult) -> Self {
        MovieSummary {
            id: m.id,
            title: m.title,
            poster_path: m.poster_path,
            backdrop_path: m.backdrop_path,
            overview: m.overview,
            release_date: m.release_date.as_deref().and_then(parse_release_date),
            vote_average: m.vote_average,
            genre_ids: dedup_ids(m.genre_ids),
        }
    }
}

impl From<MovieAppended> for MovieDetails {
    fn from(d: MovieAppended) -> Self {
        let summary = MovieSummary {
            id: d.id,
            title: d.title,
            poster_path: d.poster_path,
            backdrop_path: d.backdrop_path,
            overview: d.overview,
            release_date: d.release_date.as_deref().and_then(parse_release_date),
            vote_average: d.vote_average,
            genre_ids: dedup_ids(d.genres.iter().map(|g| g.id).collect()),
        };
        MovieDetails {
            summary,
            genres: d.genres,
            runtime: d.runtime.filter(|minutes| *minutes > 0),
            tagline: d.tagline.unwrap_or_default(),
            cast: d
                .credits
                .cast
                .into_iter()
                .take(MAX_CAST)
                .map(|c| CastMember {
                    id: c.id,
                    name: c.name,
                    character: c.character,
                    profile_path: c.profile_path,
                })
                .collect(),
            similar: d
                .similar
                .results
                .into_iter()
                .take(MAX_SIMILAR)
                .map(MovieSummary::from)
                .collect(),
            videos: youtube_videos(d.videos),
        }
    }
}

/// TMDB sends `""` for unknown dates.
fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn dedup_ids(mut ids: Vec<i32>) -> Vec<i32> {
    let mut seen = Vec::with_capacity(ids.len());
    ids.retain(|id| {
        if seen.contains(id) {
            false
        } else {
            seen.push(*id);
            true
        }
    });
    ids
}

fn youtube_videos(videos: Videos) -> Vec<VideoRef> {
    videos
        .results
        .into_iter()
        .filter(|v| v.site.eq_ignore_ascii_case("YouTube"))
        .map(|v| VideoRef {
            key: v.key,
            name: v.name,
            video_type: v.video_type,
        })
        .collect()
}
