//! Mapping from navigation paths to screens.

use reqwest::Url;

/// A screen reachable by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Movies,
    /// Search screen, with the initial query from `?q=` (possibly empty).
    Search { query: String },
    Genres,
    Genre(u32),
    Movie(u32),
    Profile,
    NotFound,
}

impl Route {
    /// Resolve a path such as `/movie/603` or `/search?q=heat`.
    ///
    /// Unknown paths and non-numeric ids resolve to [`Route::NotFound`].
    pub fn parse(path: &str) -> Self {
        let Ok(base) = Url::parse("http://localhost/") else {
            return Route::NotFound;
        };
        let Ok(url) = base.join(path) else {
            return Route::NotFound;
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] => Route::Home,
            ["movies"] => Route::Movies,
            ["search"] => Route::Search {
                query: url
                    .query_pairs()
                    .find(|(key, _)| key == "q")
                    .map(|(_, value)| value.into_owned())
                    .unwrap_or_default(),
            },
            ["genres"] => Route::Genres,
            ["genre", id] => id.parse().map_or(Route::NotFound, Route::Genre),
            ["movie", id] => id.parse().map_or(Route::NotFound, Route::Movie),
            ["profile"] => Route::Profile,
            _ => Route::NotFound,
        }
    }

    /// Path that resolves back to this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Movies => "/movies".to_string(),
            Route::Search { query } if query.is_empty() => "/search".to_string(),
            Route::Search { query } => {
                let Ok(mut url) = Url::parse("http://localhost/search") else {
                    return "/search".to_string();
                };
                url.query_pairs_mut().append_pair("q", query);
                format!("/search?{}", url.query().unwrap_or_default())
            }
            Route::Genres => "/genres".to_string(),
            Route::Genre(id) => format!("/genre/{}", id),
            Route::Movie(id) => format!("/movie/{}", id),
            Route::Profile => "/profile".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }
}
