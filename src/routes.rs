use crate::catalog::CategoryKey;
use crate::pages::{PageKind, SortOrder};
use serde::Deserialize;
use std::fmt;

/// A navigable location in the browser-facing app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Movie(i32),
    Category { key: CategoryKey, sort: SortOrder },
    Search(String),
    Watch(i32),
}

impl Route {
    /// Parse a path with optional query string, e.g. `/search?q=dark%20knight`.
    pub fn parse(input: &str) -> Option<Self> {
        let (path, query) = match input.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (input, None),
        };
        let params = RouteQuery::parse(query);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Route::Home),
            ["movie", id] => id.parse().ok().map(Route::Movie),
            ["watch", id] => id.parse().ok().map(Route::Watch),
            ["category", key] => {
                let key = CategoryKey::parse(key)?;
                let sort = params
                    .sort
                    .as_deref()
                    .and_then(SortOrder::parse)
                    .unwrap_or_default();
                Some(Route::Category { key, sort })
            }
            ["search"] => Some(Route::Search(params.q.unwrap_or_default())),
            _ => None,
        }
    }

    pub fn page_kind(&self) -> PageKind {
        match self {
            Route::Home => PageKind::Home,
            Route::Movie(_) => PageKind::Details,
            Route::Category { .. } => PageKind::Category,
            Route::Search(_) => PageKind::Search,
            Route::Watch(_) => PageKind::Watch,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/"),
            Route::Movie(id) => write!(f, "/movie/{id}"),
            Route::Watch(id) => write!(f, "/watch/{id}"),
            Route::Category { key, sort } => {
                write!(f, "/category/{key}")?;
                if *sort != SortOrder::default() {
                    write!(f, "?sort={}", sort.key())?;
                }
                Ok(())
            }
            Route::Search(q) => write!(f, "/search?q={}", urlencoding::encode(q)),
        }
    }
}

/// The query parameters any route reads; unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct RouteQuery {
    q: Option<String>,
    sort: Option<String>,
}

impl RouteQuery {
    fn parse(query: Option<&str>) -> Self {
        query
            .and_then(|q| serde_urlencoded::from_str(q).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Collection;

    #[test]
    fn parses_every_route() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse(""), Some(Route::Home));
        assert_eq!(Route::parse("/movie/42"), Some(Route::Movie(42)));
        assert_eq!(Route::parse("/watch/7/"), Some(Route::Watch(7)));
        assert_eq!(
            Route::parse("/category/top_rated"),
            Some(Route::Category {
                key: CategoryKey::Collection(Collection::TopRated),
                sort: SortOrder::Popularity,
            })
        );
        assert_eq!(
            Route::parse("/category/28?sort=title"),
            Some(Route::Category {
                key: CategoryKey::Genre(28),
                sort: SortOrder::Title,
            })
        );
    }

    #[test]
    fn search_query_is_decoded() {
        assert_eq!(
            Route::parse("/search?q=dark%20knight"),
            Some(Route::Search("dark knight".to_string()))
        );
        assert_eq!(
            Route::parse("/search?page=2&q=the+matrix"),
            Some(Route::Search("the matrix".to_string()))
        );
        assert_eq!(Route::parse("/search"), Some(Route::Search(String::new())));
        assert_eq!(
            Route::parse("/search?q=caf%C3%A9&sort=title"),
            Some(Route::Search("café".to_string()))
        );
    }

    #[test]
    fn malformed_query_falls_back_to_defaults() {
        assert_eq!(
            Route::parse("/category/popular?sort=sideways"),
            Some(Route::Category {
                key: CategoryKey::Collection(Collection::Popular),
                sort: SortOrder::Popularity,
            })
        );
        assert_eq!(
            Route::parse("/search?q=blade runner"),
            Some(Route::Search("blade runner".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_paths() {
        assert_eq!(Route::parse("/movie/abc"), None);
        assert_eq!(Route::parse("/category/westerns"), None);
        assert_eq!(Route::parse("/profile"), None);
    }

    #[test]
    fn display_round_trips() {
        for path in [
            "/",
            "/movie/3",
            "/watch/3",
            "/category/upcoming",
            "/category/18?sort=release_date",
            "/search?q=fight%20club",
        ] {
            assert_eq!(Route::parse(path).unwrap().to_string(), path);
        }
    }
}
