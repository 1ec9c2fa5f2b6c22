//! Typed catalog model returned by the movie catalog client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Highest page number the TMDB API will serve for any paginated listing.
pub const MAX_PAGES: u32 = 500;

/// A movie as it appears in list, search and discover results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u32,
    pub title: String,
    /// Synopsis (may be empty).
    pub overview: String,
    /// Poster path, relative to the image host.
    pub poster_path: Option<String>,
    /// Backdrop path, relative to the image host.
    pub backdrop_path: Option<String>,
    /// Release date (YYYY-MM-DD). Absent when the catalog sent none.
    pub release_date: Option<String>,
    /// Average vote (0-10).
    pub vote_average: f32,
    pub vote_count: u32,
    pub genre_ids: Vec<u32>,
    pub popularity: f64,
    pub adult: bool,
    pub original_language: String,
}

impl Movie {
    /// Get the release year from the release date.
    pub fn year(&self) -> Option<u32> {
        self.release_date
            .as_ref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }

    /// Rating with one decimal, the only precision the catalog meaningfully carries.
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.vote_average)
    }
}

/// A genre as listed by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// A video attached to a movie (trailers, teasers, clips).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    pub id: String,
    /// Site-specific key (the YouTube video id for YouTube videos).
    pub key: String,
    pub name: String,
    /// Hosting site, e.g. "YouTube".
    pub site: String,
    /// Video kind, e.g. "Trailer" or "Teaser".
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastMember {
    pub id: u32,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrewMember {
    pub id: u32,
    pub name: String,
    pub job: String,
    pub profile_path: Option<String>,
}

/// Cast and crew of a movie.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credits {
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductionCompany {
    pub id: u32,
    pub name: String,
    pub logo_path: Option<String>,
}

/// Full movie details, fetched per detail view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<Genre>,
    pub tagline: Option<String>,
    /// Production status, e.g. "Released".
    pub status: String,
    pub budget: u64,
    pub revenue: u64,
    pub production_companies: Vec<ProductionCompany>,
    /// Present when the request appended the videos sub-resource.
    pub videos: Option<Vec<Video>>,
    /// Present when the request appended the credits sub-resource.
    pub credits: Option<Credits>,
}

impl MovieDetails {
    /// Number of billed cast members shown on a detail page.
    pub const TOP_CAST: usize = 8;

    /// First YouTube trailer, if any.
    pub fn trailer(&self) -> Option<&Video> {
        self.videos
            .as_ref()?
            .iter()
            .find(|v| v.kind == "Trailer" && v.site == "YouTube")
    }

    /// First crew member credited as director.
    pub fn director(&self) -> Option<&CrewMember> {
        self.credits
            .as_ref()?
            .crew
            .iter()
            .find(|c| c.job == "Director")
    }

    /// Top billed cast, in billing order.
    pub fn top_cast(&self) -> &[CastMember] {
        match &self.credits {
            Some(credits) => &credits.cast[..credits.cast.len().min(Self::TOP_CAST)],
            None => &[],
        }
    }

    /// Runtime formatted as "2h 16m".
    pub fn runtime_label(&self) -> Option<String> {
        self.runtime_minutes
            .map(|minutes| format!("{}h {}m", minutes / 60, minutes % 60))
    }
}

/// One page of movie results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MoviesPage {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u32,
}

impl MoviesPage {
    /// Page count a pager may offer, capped at the API's ceiling.
    pub fn navigable_pages(&self) -> u32 {
        self.total_pages.min(MAX_PAGES)
    }
}

/// Curated movie listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieCategory {
    Popular,
    TopRated,
    Upcoming,
    NowPlaying,
    TrendingDay,
    TrendingWeek,
}

impl MovieCategory {
    /// API path, relative to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            MovieCategory::Popular => "movie/popular",
            MovieCategory::TopRated => "movie/top_rated",
            MovieCategory::Upcoming => "movie/upcoming",
            MovieCategory::NowPlaying => "movie/now_playing",
            MovieCategory::TrendingDay => "trending/movie/day",
            MovieCategory::TrendingWeek => "trending/movie/week",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovieCategory::Popular => "popular",
            MovieCategory::TopRated => "top_rated",
            MovieCategory::Upcoming => "upcoming",
            MovieCategory::NowPlaying => "now_playing",
            MovieCategory::TrendingDay => "trending_day",
            MovieCategory::TrendingWeek => "trending_week",
        }
    }
}

/// Sort orders accepted by discover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "popularity.desc")]
    PopularityDesc,
    #[serde(rename = "vote_average.desc")]
    VoteAverageDesc,
    #[serde(rename = "release_date.desc")]
    ReleaseDateDesc,
    #[serde(rename = "release_date.asc")]
    ReleaseDateAsc,
    #[serde(rename = "revenue.desc")]
    RevenueDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::PopularityDesc,
        SortKey::VoteAverageDesc,
        SortKey::ReleaseDateDesc,
        SortKey::ReleaseDateAsc,
        SortKey::RevenueDesc,
    ];

    /// Wire value for the `sort_by` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::PopularityDesc => "popularity.desc",
            SortKey::VoteAverageDesc => "vote_average.desc",
            SortKey::ReleaseDateDesc => "release_date.desc",
            SortKey::ReleaseDateAsc => "release_date.asc",
            SortKey::RevenueDesc => "revenue.desc",
        }
    }

    /// Human readable label for sort pickers.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::PopularityDesc => "Most Popular",
            SortKey::VoteAverageDesc => "Highest Rated",
            SortKey::ReleaseDateDesc => "Newest First",
            SortKey::ReleaseDateAsc => "Oldest First",
            SortKey::RevenueDesc => "Highest Revenue",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown sort key: {}", s))
    }
}

/// Parameters for a discover request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscoverQuery {
    pub page: u32,
    /// Unset means popularity descending.
    pub sort_by: Option<SortKey>,
    pub year: Option<u32>,
    /// Minimum average vote (whole stars).
    pub min_rating: Option<u8>,
    pub genres: Vec<u32>,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoverQuery {
    pub fn new() -> Self {
        Self {
            page: 1,
            sort_by: None,
            year: None,
            min_rating: None,
            genres: Vec::new(),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_sort(mut self, sort_by: SortKey) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_min_rating(mut self, min_rating: u8) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn with_genre(mut self, genre_id: u32) -> Self {
        self.genres.push(genre_id);
        self
    }

    /// Sort order actually sent to the API.
    pub fn effective_sort(&self) -> SortKey {
        self.sort_by.unwrap_or_default()
    }
}
