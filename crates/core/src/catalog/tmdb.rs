//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::image::{ImageSize, ImageUrls};
use super::types::{
    CastMember, Credits, CrewMember, DiscoverQuery, Genre, Movie, MovieCategory, MovieDetails,
    MoviesPage, ProductionCompany, Video,
};
use super::{CatalogError, MovieCatalog};
use crate::config::CatalogConfig;
use crate::metrics;

/// Sub-resources fetched together with movie details.
const DETAIL_APPENDS: &str = "videos,credits";

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
    images: ImageUrls,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            language: config.language,
            images: ImageUrls::new(config.image_base_url),
        })
    }

    /// Image URL builder bound to the configured image host.
    pub fn images(&self) -> &ImageUrls {
        &self.images
    }

    /// Fully qualified image URL, or an empty string when `path` is absent.
    pub fn image_url(&self, path: Option<&str>, size: ImageSize) -> String {
        self.images.url(path, size)
    }

    /// Build a GET request carrying the credential and language parameters.
    fn request(&self, path: &str, params: &[(&str, String)]) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);

        self.client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
    }

    /// Send a request and decode its JSON body, recording metrics.
    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let started = Instant::now();
        let result = self.send(path, params).await;

        metrics::CATALOG_REQUEST_DURATION
            .with_label_values(&[operation])
            .observe(started.elapsed().as_secs_f64());
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::CATALOG_REQUESTS
            .with_label_values(&[operation, outcome])
            .inc();

        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let response = self.request(path, params).send().await?;

        let status = response.status();
        if status == 401 {
            return Err(CatalogError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == 404 {
            return Err(CatalogError::NotFound(path.to_string()));
        }
        if status == 429 {
            return Err(CatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| {
            CatalogError::Parse(format!("Failed to parse response for {}: {}", path, e))
        })
    }
}

/// Query parameters for a discover request.
fn discover_params(query: &DiscoverQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.max(1).to_string()),
        ("sort_by", query.effective_sort().as_str().to_string()),
    ];

    if let Some(year) = query.year {
        params.push(("year", year.to_string()));
    }
    if let Some(rating) = query.min_rating {
        params.push(("vote_average.gte", rating.to_string()));
    }
    if !query.genres.is_empty() {
        let genres: Vec<String> = query.genres.iter().map(|g| g.to_string()).collect();
        params.push(("with_genres", genres.join(",")));
    }

    params
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn list_by_category(
        &self,
        category: MovieCategory,
        page: u32,
    ) -> Result<MoviesPage, CatalogError> {
        debug!("TMDB list: category={}, page={}", category.as_str(), page);

        let response: TmdbPageResponse = self
            .fetch(
                "list_by_category",
                category.path(),
                &[("page", page.max(1).to_string())],
            )
            .await?;

        Ok(response.into())
    }

    async fn discover(&self, query: &DiscoverQuery) -> Result<MoviesPage, CatalogError> {
        debug!("TMDB discover: {:?}", query);

        let response: TmdbPageResponse = self
            .fetch("discover", "discover/movie", &discover_params(query))
            .await?;

        Ok(response.into())
    }

    async fn search(&self, query: &str, page: u32) -> Result<MoviesPage, CatalogError> {
        debug!("TMDB movie search: query='{}', page={}", query, page);

        let response: TmdbPageResponse = self
            .fetch(
                "search",
                "search/movie",
                &[
                    ("query", query.to_string()),
                    ("page", page.max(1).to_string()),
                ],
            )
            .await?;

        Ok(response.into())
    }

    async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        debug!("TMDB genre list");

        let response: TmdbGenreList = self.fetch("genres", "genre/movie/list", &[]).await?;

        Ok(response.genres.into_iter().map(|g| g.into()).collect())
    }

    async fn movie_details(&self, movie_id: u32) -> Result<MovieDetails, CatalogError> {
        debug!("TMDB get movie: id={}", movie_id);

        let path = format!("movie/{}", movie_id);
        let details: TmdbMovieDetails = self
            .fetch(
                "movie_details",
                &path,
                &[("append_to_response", DETAIL_APPENDS.to_string())],
            )
            .await?;

        Ok(details.into())
    }

    async fn similar(&self, movie_id: u32) -> Result<MoviesPage, CatalogError> {
        debug!("TMDB similar: id={}", movie_id);

        let path = format!("movie/{}/similar", movie_id);
        let response: TmdbPageResponse = self.fetch("similar", &path, &[]).await?;

        Ok(response.into())
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

/// Treat an explicit `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct TmdbPageResponse {
    #[serde(default, deserialize_with = "nullable")]
    page: u32,
    #[serde(default, deserialize_with = "nullable")]
    results: Vec<TmdbMovieResult>,
    #[serde(default, deserialize_with = "nullable")]
    total_pages: u32,
    #[serde(default, deserialize_with = "nullable")]
    total_results: u32,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    id: u32,
    #[serde(default, deserialize_with = "nullable")]
    title: String,
    #[serde(default, deserialize_with = "nullable")]
    overview: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    genre_ids: Vec<u32>,
    popularity: Option<f64>,
    adult: Option<bool>,
    original_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    id: u32,
    #[serde(default, deserialize_with = "nullable")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbGenreList {
    #[serde(default, deserialize_with = "nullable")]
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetails {
    id: u32,
    #[serde(default, deserialize_with = "nullable")]
    title: String,
    #[serde(default, deserialize_with = "nullable")]
    overview: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    popularity: Option<f64>,
    adult: Option<bool>,
    original_language: Option<String>,
    runtime: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    genres: Vec<TmdbGenre>,
    tagline: Option<String>,
    status: Option<String>,
    budget: Option<u64>,
    revenue: Option<u64>,
    #[serde(default, deserialize_with = "nullable")]
    production_companies: Vec<TmdbCompany>,
    videos: Option<TmdbVideoList>,
    credits: Option<TmdbCredits>,
}

#[derive(Debug, Deserialize)]
struct TmdbCompany {
    id: u32,
    #[serde(default, deserialize_with = "nullable")]
    name: String,
    logo_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbVideoList {
    #[serde(default, deserialize_with = "nullable")]
    results: Vec<TmdbVideo>,
}

#[derive(Debug, Deserialize)]
struct TmdbVideo {
    #[serde(default, deserialize_with = "nullable")]
    id: String,
    #[serde(default, deserialize_with = "nullable")]
    key: String,
    #[serde(default, deserialize_with = "nullable")]
    name: String,
    #[serde(default, deserialize_with = "nullable")]
    site: String,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct TmdbCredits {
    #[serde(default, deserialize_with = "nullable")]
    cast: Vec<TmdbCast>,
    #[serde(default, deserialize_with = "nullable")]
    crew: Vec<TmdbCrew>,
}

#[derive(Debug, Deserialize)]
struct TmdbCast {
    id: u32,
    #[serde(default, deserialize_with = "nullable")]
    name: String,
    #[serde(default, deserialize_with = "nullable")]
    character: String,
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbCrew {
    id: u32,
    #[serde(default, deserialize_with = "nullable")]
    name: String,
    #[serde(default, deserialize_with = "nullable")]
    job: String,
    profile_path: Option<String>,
}

// ============================================================================
// Conversions
// ============================================================================

/// Empty strings mean "absent" for dates and image paths.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<TmdbMovieResult> for Movie {
    fn from(r: TmdbMovieResult) -> Self {
        Self {
            id: r.id,
            title: r.title,
            overview: r.overview,
            poster_path: non_empty(r.poster_path),
            backdrop_path: non_empty(r.backdrop_path),
            release_date: non_empty(r.release_date),
            vote_average: r.vote_average.unwrap_or(0.0),
            vote_count: r.vote_count.unwrap_or(0),
            genre_ids: r.genre_ids,
            popularity: r.popularity.unwrap_or(0.0),
            adult: r.adult.unwrap_or(false),
            original_language: r.original_language.unwrap_or_default(),
        }
    }
}

impl From<TmdbPageResponse> for MoviesPage {
    fn from(r: TmdbPageResponse) -> Self {
        Self {
            page: r.page,
            results: r.results.into_iter().map(|m| m.into()).collect(),
            total_pages: r.total_pages,
            total_results: r.total_results,
        }
    }
}

impl From<TmdbGenre> for Genre {
    fn from(g: TmdbGenre) -> Self {
        Self {
            id: g.id,
            name: g.name,
        }
    }
}

impl From<TmdbMovieDetails> for MovieDetails {
    fn from(d: TmdbMovieDetails) -> Self {
        let genres: Vec<Genre> = d.genres.into_iter().map(|g| g.into()).collect();

        Self {
            movie: Movie {
                id: d.id,
                title: d.title,
                overview: d.overview,
                poster_path: non_empty(d.poster_path),
                backdrop_path: non_empty(d.backdrop_path),
                release_date: non_empty(d.release_date),
                vote_average: d.vote_average.unwrap_or(0.0),
                vote_count: d.vote_count.unwrap_or(0),
                genre_ids: genres.iter().map(|g| g.id).collect(),
                popularity: d.popularity.unwrap_or(0.0),
                adult: d.adult.unwrap_or(false),
                original_language: d.original_language.unwrap_or_default(),
            },
            runtime_minutes: d.runtime.filter(|&r| r > 0),
            genres,
            tagline: non_empty(d.tagline),
            status: d.status.unwrap_or_default(),
            budget: d.budget.unwrap_or(0),
            revenue: d.revenue.unwrap_or(0),
            production_companies: d
                .production_companies
                .into_iter()
                .map(|c| ProductionCompany {
                    id: c.id,
                    name: c.name,
                    logo_path: non_empty(c.logo_path),
                })
                .collect(),
            videos: d.videos.map(|list| {
                list.results
                    .into_iter()
                    .map(|v| Video {
                        id: v.id,
                        key: v.key,
                        name: v.name,
                        site: v.site,
                        kind: v.kind,
                    })
                    .collect()
            }),
            credits: d.credits.map(|c| Credits {
                cast: c
                    .cast
                    .into_iter()
                    .map(|m| CastMember {
                        id: m.id,
                        name: m.name,
                        character: m.character,
                        profile_path: non_empty(m.profile_path),
                    })
                    .collect(),
                crew: c
                    .crew
                    .into_iter()
                    .map(|m| CrewMember {
                        id: m.id,
                        name: m.name,
                        job: m.job,
                        profile_path: non_empty(m.profile_path),
                    })
                    .collect(),
            }),
        }
    }
}
