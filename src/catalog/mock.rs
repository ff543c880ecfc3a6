//! Static in-memory catalog used until a remote catalog is configured.
use super::CatalogApi;
use crate::models::{CastMember, Genre, MovieDetails, MovieSummary, VideoRef};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;

const DETAIL_RUNTIME: u32 = 120;
const DETAIL_TAGLINE: &str = "Experience the magic of cinema";
const FALLBACK_OVERVIEW: &str =
    "A captivating cinematic experience that will leave you breathless.";
const MAX_SIMILAR: usize = 6;

static GENRES: Lazy<Vec<Genre>> = Lazy::new(|| {
    [
        (28, "Action"),
        (12, "Adventure"),
        (16, "Animation"),
        (35, "Comedy"),
        (80, "Crime"),
        (18, "Drama"),
        (10751, "Family"),
        (14, "Fantasy"),
        (36, "History"),
        (27, "Horror"),
    ]
    .into_iter()
    .map(|(id, name)| Genre {
        id,
        name: name.to_string(),
    })
    .collect()
});

static CAST: Lazy<Vec<CastMember>> = Lazy::new(|| {
    [
        (1, "Leonardo DiCaprio", "John Doe", "/example.jpg"),
        (2, "Brad Pitt", "Mike Smith", "/example2.jpg"),
        (3, "Margot Robbie", "Jane Smith", "/example3.jpg"),
        (4, "Jennifer Lawrence", "Sarah Connor", "/example4.jpg"),
    ]
    .into_iter()
    .map(|(id, name, character, profile)| CastMember {
        id,
        name: name.to_string(),
        character: character.to_string(),
        profile_path: Some(profile.to_string()),
    })
    .collect()
});

static MOVIES: Lazy<Vec<MovieSummary>> = Lazy::new(|| {
    vec![
        movie(
            1,
            "Inception",
            "/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg",
            "/s3TBrRGB1iav7gFOCNx3H31MoES.jpg",
            "A thief who steals corporate secrets through the use of dream-sharing technology is given the inverse task of planting an idea into the mind of a C.E.O.",
            (2010, 7, 16),
            8.4,
            &[28, 12, 878],
        ),
        movie(
            2,
            "The Shawshank Redemption",
            "/q6y0Go1tsGEsmtFryDOJo3dEmqu.jpg",
            "/kXfqcdQKsToO0OUXHcrrNCHDBzO.jpg",
            "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.",
            (1994, 9, 23),
            8.7,
            &[18, 80],
        ),
        movie(
            3,
            "The Godfather",
            "/3bhkrj58Vtu7enYsRolD1fZdja1.jpg",
            "/tmU7GeKVybMWFButWEGl2M4GeiP.jpg",
            "The aging patriarch of an organized crime dynasty transfers control of his clandestine empire to his reluctant son.",
            (1972, 3, 14),
            8.7,
            &[18, 80],
        ),
        movie(
            4,
            "The Dark Knight",
            "/qJ2tW6WMUDux911r6m7haRef0WH.jpg",
            "/nMKdUUepR0i5zn0y1T4CsSB5chy.jpg",
            "When the menace known as the Joker wreaks havoc and chaos on the people of Gotham, Batman must accept one of the greatest psychological and physical tests of his ability to fight injustice.",
            (2008, 7, 16),
            8.5,
            &[28, 80, 18],
        ),
        movie(
            5,
            "Pulp Fiction",
            "/d5iIlFn5s0ImszYzBPb8JPIfbXD.jpg",
            "/suaEOtk1N1sgg2MTM7oZd2cfVp3.jpg",
            "The lives of two mob hitmen, a boxer, a gangster and his wife, and a pair of diner bandits intertwine in four tales of violence and redemption.",
            (1994, 10, 14),
            8.5,
            &[53, 80],
        ),
        movie(
            6,
            "Fight Club",
            "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
            "/rr7E0NoGKxvbkb8Heitq7bujVcX.jpg",
            "An insomniac office worker and a devil-may-care soapmaker form an underground fight club that evolves into something much, much more.",
            (1999, 10, 15),
            8.4,
            &[18],
        ),
        movie(
            7,
            "Forrest Gump",
            "/arw2vcBveWOVZr6pxd9XTd1TdQa.jpg",
            "/3h1JZGDhZ8nzxdgvkxha0qBqi05.jpg",
            "The presidencies of Kennedy and Johnson, the events of Vietnam, Watergate, and other historical events unfold through the perspective of an Alabama man with an IQ of 75, whose only desire is to be reunited with his childhood sweetheart.",
            (1994, 7, 6),
            8.5,
            &[35, 18, 10749],
        ),
        movie(
            8,
            "The Matrix",
            "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
            "/fNG7i7RqMErkcqhohV2a6cV1Ehy.jpg",
            "When a beautiful stranger leads computer hacker Neo to a forbidding underworld, he discovers the shocking truth--the life he knows is the elaborate deception of an evil cyber-intelligence.",
            (1999, 3, 30),
            8.2,
            &[28, 878],
        ),
    ]
});

#[allow(clippy::too_many_arguments)]
fn movie(
    id: i32,
    title: &str,
    poster: &str,
    backdrop: &str,
    overview: &str,
    (y, m, d): (i32, u32, u32),
    vote_average: f32,
    genre_ids: &[i32],
) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        poster_path: Some(poster.to_string()),
        backdrop_path: Some(backdrop.to_string()),
        overview: overview.to_string(),
        release_date: NaiveDate::from_ymd_opt(y, m, d),
        vote_average,
        genre_ids: genre_ids.to_vec(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockCatalog;

impl MockCatalog {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>> {
        Ok(MOVIES.clone())
    }

    async fn fetch_top_rated(&self) -> Result<Vec<MovieSummary>> {
        let mut movies = MOVIES.clone();
        // Stable sort keeps catalog order between equal ratings.
        movies.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average));
        Ok(movies)
    }

    async fn fetch_upcoming(&self) -> Result<Vec<MovieSummary>> {
        Ok(MOVIES.iter().rev().cloned().collect())
    }

    async fn fetch_genres(&self) -> Result<Vec<Genre>> {
        Ok(GENRES.clone())
    }

    async fn fetch_details(&self, id: i32) -> Result<Option<MovieDetails>> {
        let Some(found) = MOVIES.iter().find(|m| m.id == id) else {
            return Ok(None);
        };
        let mut summary = found.clone();
        if summary.overview.is_empty() {
            summary.overview = FALLBACK_OVERVIEW.to_string();
        }
        Ok(Some(MovieDetails {
            summary,
            genres: GENRES.iter().take(3).cloned().collect(),
            runtime: Some(DETAIL_RUNTIME),
            tagline: DETAIL_TAGLINE.to_string(),
            cast: CAST.clone(),
            similar: MOVIES
                .iter()
                .filter(|m| m.id != id)
                .take(MAX_SIMILAR)
                .cloned()
                .collect(),
            videos: vec![VideoRef {
                key: "dQw4w9WgXcQ".to_string(),
                name: "Official Trailer".to_string(),
                video_type: "Trailer".to_string(),
            }],
        }))
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>> {
        let needle = query.to_lowercase();
        Ok(MOVIES
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn fetch_by_genre(&self, genre_id: i32) -> Result<Vec<MovieSummary>> {
        Ok(MOVIES
            .iter()
            .filter(|m| m.genre_ids.contains(&genre_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(movies: &[MovieSummary]) -> Vec<i32> {
        movies.iter().map(|m| m.id).collect()
    }

    #[tokio::test]
    async fn top_rated_is_sorted_by_rating_desc() {
        let movies = MockCatalog::new().fetch_top_rated().await.unwrap();
        assert!(movies
            .windows(2)
            .all(|w| w[0].vote_average >= w[1].vote_average));
        assert_eq!(ids(&movies)[..2], [2, 3]);
    }

    #[tokio::test]
    async fn upcoming_reverses_popular() {
        let catalog = MockCatalog::new();
        let mut popular = ids(&catalog.fetch_popular().await.unwrap());
        popular.reverse();
        assert_eq!(ids(&catalog.fetch_upcoming().await.unwrap()), popular);
    }

    #[tokio::test]
    async fn details_for_known_id() {
        let details = MockCatalog::new().fetch_details(4).await.unwrap().unwrap();
        assert_eq!(details.title(), "The Dark Knight");
        assert_eq!(details.genres.len(), 3);
        assert_eq!(details.runtime, Some(120));
        assert_eq!(details.cast.len(), 4);
        assert_eq!(details.similar.len(), 6);
        assert!(details.similar.iter().all(|m| m.id != 4));
        assert_eq!(details.trailer().map(|v| v.key.as_str()), Some("dQw4w9WgXcQ"));
    }

    #[tokio::test]
    async fn details_for_unknown_id_is_none() {
        assert!(MockCatalog::new().fetch_details(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let catalog = MockCatalog::new();
        assert_eq!(ids(&catalog.search("THE ").await.unwrap()), [2, 3, 4, 8]);
        assert!(catalog.search("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn by_genre_filters_on_genre_ids() {
        let movies = MockCatalog::new().fetch_by_genre(878).await.unwrap();
        assert_eq!(ids(&movies), [1, 8]);
    }
}
