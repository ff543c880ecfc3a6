use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieSummary {
    pub id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: String,
    pub release_date: Option<NaiveDate>,
    pub vote_average: f32,
    pub genre_ids: Vec<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CastMember {
    pub id: i32,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub summary: MovieSummary,
    pub genres: Vec<Genre>,
    /// Minutes; `None` when the catalog has no runtime for the film.
    pub runtime: Option<u32>,
    pub tagline: String,
    pub cast: Vec<CastMember>,
    pub similar: Vec<MovieSummary>,
    pub videos: Vec<VideoRef>,
}

impl MovieDetails {
    pub fn title(&self) -> &str {
        &self.summary.title
    }

    /// First trailer, falling back to a teaser.
    pub fn trailer(&self) -> Option<&VideoRef> {
        self.videos
            .iter()
            .find(|v| v.video_type == "Trailer")
            .or_else(|| self.videos.iter().find(|v| v.video_type == "Teaser"))
    }
}
