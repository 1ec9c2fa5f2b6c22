//! Locally owned watch state records.
//!
//! Field names serialize in camelCase so persisted blobs keep the layout
//! the storage keys have always held.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Watch progress for one movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub movie_id: u32,
    pub title: String,
    /// Poster path snapshot taken when the record was written.
    pub poster_path: Option<String>,
    /// Backdrop path snapshot taken when the record was written.
    pub backdrop_path: Option<String>,
    /// Percentage watched, 0-100.
    pub progress: f64,
    /// Elapsed playback in seconds.
    pub current_time: u64,
    /// Total duration in seconds.
    pub duration: u64,
    pub last_watched: DateTime<Utc>,
}

impl ProgressRecord {
    /// Whether the movie counts as started but unfinished.
    pub fn is_in_progress(&self) -> bool {
        self.progress > 0.0 && self.progress < super::COMPLETION_THRESHOLD
    }

    /// Progress rounded to a whole percent for display.
    pub fn percent_label(&self) -> String {
        format!("{}% complete", self.progress.round() as u32)
    }
}

/// A movie saved to the "watch later" list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub movie_id: u32,
    pub title: String,
    pub poster_path: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Watchlist addition request. The store stamps `added_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWatchlistEntry {
    pub movie_id: u32,
    pub title: String,
    pub poster_path: Option<String>,
}

impl NewWatchlistEntry {
    pub fn new(movie_id: u32, title: impl Into<String>, poster_path: Option<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            poster_path,
        }
    }

    pub(crate) fn stamped(self, added_at: DateTime<Utc>) -> WatchlistEntry {
        WatchlistEntry {
            movie_id: self.movie_id,
            title: self.title,
            poster_path: self.poster_path,
            added_at,
        }
    }
}
