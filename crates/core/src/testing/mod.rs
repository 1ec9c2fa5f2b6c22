//! Testing utilities and mock implementations.
//!
//! This module provides a scriptable catalog and a storage backend with
//! switchable failures, so screens and the watch store can be exercised
//! without network access or a real database.
//!
//! # Example
//!
//! ```rust,ignore
//! use bloxwave_core::testing::{fixtures, MockCatalog};
//! use bloxwave_core::catalog::MovieCategory;
//!
//! let catalog = MockCatalog::new();
//! catalog
//!     .set_category(MovieCategory::Popular, fixtures::page(1, 3, vec![fixtures::movie(1, "Heat")]))
//!     .await;
//!
//! // Hand `catalog` to a screen, then inspect what it asked for.
//! let queries = catalog.recorded_queries().await;
//! ```

mod failing_storage;
mod mock_catalog;

pub use failing_storage::FailingStorage;
pub use mock_catalog::{MockCatalog, RecordedCatalogQuery, RequestGate};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::catalog::{
        CastMember, Credits, CrewMember, Genre, Movie, MovieDetails, MoviesPage,
        ProductionCompany, Video,
    };
    use crate::watch::ProgressRecord;

    /// Duration used by progress fixtures, in seconds.
    pub const PROGRESS_DURATION: u64 = 7200;

    /// Create a test movie with reasonable defaults.
    pub fn movie(id: u32, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            overview: format!("A movie about {}.", title.to_lowercase()),
            poster_path: Some(format!("/poster-{}.jpg", id)),
            backdrop_path: Some(format!("/backdrop-{}.jpg", id)),
            release_date: Some("1999-03-30".to_string()),
            vote_average: 7.5,
            vote_count: 1200,
            genre_ids: vec![28, 878],
            popularity: 50.0,
            adult: false,
            original_language: "en".to_string(),
        }
    }

    /// Create test movie details with a trailer, a director and ten cast members.
    pub fn movie_details(id: u32, title: &str) -> MovieDetails {
        MovieDetails {
            movie: movie(id, title),
            runtime_minutes: Some(136),
            genres: vec![
                Genre {
                    id: 28,
                    name: "Action".to_string(),
                },
                Genre {
                    id: 878,
                    name: "Science Fiction".to_string(),
                },
            ],
            tagline: Some("Welcome to the real world.".to_string()),
            status: "Released".to_string(),
            budget: 63_000_000,
            revenue: 463_517_383,
            production_companies: vec![ProductionCompany {
                id: 79,
                name: "Village Roadshow Pictures".to_string(),
                logo_path: None,
            }],
            videos: Some(vec![
                Video {
                    id: "v1".to_string(),
                    key: "featurette-key".to_string(),
                    name: "Behind the Scenes".to_string(),
                    site: "YouTube".to_string(),
                    kind: "Featurette".to_string(),
                },
                Video {
                    id: "v2".to_string(),
                    key: "vimeo-key".to_string(),
                    name: "Official Trailer (Vimeo)".to_string(),
                    site: "Vimeo".to_string(),
                    kind: "Trailer".to_string(),
                },
                Video {
                    id: "v3".to_string(),
                    key: "trailer-key".to_string(),
                    name: "Official Trailer".to_string(),
                    site: "YouTube".to_string(),
                    kind: "Trailer".to_string(),
                },
            ]),
            credits: Some(Credits {
                cast: (1..=10)
                    .map(|i| CastMember {
                        id: i,
                        name: format!("Actor {}", i),
                        character: format!("Character {}", i),
                        profile_path: None,
                    })
                    .collect(),
                crew: vec![
                    CrewMember {
                        id: 100,
                        name: "Joel Silver".to_string(),
                        job: "Producer".to_string(),
                        profile_path: None,
                    },
                    CrewMember {
                        id: 101,
                        name: "Lana Wachowski".to_string(),
                        job: "Director".to_string(),
                        profile_path: None,
                    },
                ],
            }),
        }
    }

    /// Create a results page.
    pub fn page(page: u32, total_pages: u32, results: Vec<Movie>) -> MoviesPage {
        MoviesPage {
            page,
            results,
            total_pages,
            total_results: total_pages * 20,
        }
    }

    /// Create `count` movies with ids starting at `first_id`.
    pub fn movies(first_id: u32, count: u32) -> Vec<Movie> {
        (first_id..first_id + count)
            .map(|id| movie(id, &format!("Movie {}", id)))
            .collect()
    }

    /// The movie genre list as the TMDB API returns it.
    pub fn genres() -> Vec<Genre> {
        [
            (28, "Action"),
            (12, "Adventure"),
            (16, "Animation"),
            (35, "Comedy"),
            (80, "Crime"),
            (99, "Documentary"),
            (18, "Drama"),
            (10751, "Family"),
            (14, "Fantasy"),
            (36, "History"),
            (27, "Horror"),
            (10402, "Music"),
            (9648, "Mystery"),
            (10749, "Romance"),
            (878, "Science Fiction"),
            (10770, "TV Movie"),
            (53, "Thriller"),
            (10752, "War"),
            (37, "Western"),
        ]
        .into_iter()
        .map(|(id, name)| Genre {
            id,
            name: name.to_string(),
        })
        .collect()
    }

    /// Create a progress record watched just now.
    pub fn progress(movie_id: u32, progress: f64) -> ProgressRecord {
        progress_at(movie_id, progress, Utc::now())
    }

    /// Create a progress record with an explicit `last_watched`.
    pub fn progress_at(movie_id: u32, progress: f64, last_watched: DateTime<Utc>) -> ProgressRecord {
        let watched = (progress.clamp(0.0, 100.0) / 100.0 * PROGRESS_DURATION as f64) as u64;
        ProgressRecord {
            movie_id,
            title: format!("Movie {}", movie_id),
            poster_path: Some(format!("/poster-{}.jpg", movie_id)),
            backdrop_path: None,
            progress,
            current_time: watched,
            duration: PROGRESS_DURATION,
            last_watched,
        }
    }
}
