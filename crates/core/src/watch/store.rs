//! Watch progress and watchlist collections over a key-value store.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::types::{NewWatchlistEntry, ProgressRecord, WatchlistEntry};
use super::{
    WatchStoreError, CONTINUE_WATCHING_LIMIT, MAX_PROGRESS_RECORDS, PROGRESS_KEY, WATCHLIST_KEY,
};
use crate::metrics;
use crate::storage::KeyValueStore;

/// Local watch state: progress records and the watchlist.
///
/// The two collections live under independent keys and are never
/// reconciled with each other. Reads fail soft to an empty collection;
/// writes surface storage errors to the caller.
#[derive(Clone)]
pub struct WatchStore {
    storage: Arc<dyn KeyValueStore>,
}

impl WatchStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    // =========================================================================
    // Progress records
    // =========================================================================

    /// All progress records, most recently started first.
    pub fn list_progress(&self) -> Vec<ProgressRecord> {
        self.read_collection(PROGRESS_KEY)
    }

    /// Insert or replace the record for `record.movie_id`.
    ///
    /// An existing record keeps its position. A new one goes to the front,
    /// and the list is then cut back to [`MAX_PROGRESS_RECORDS`].
    pub fn save_progress(&self, mut record: ProgressRecord) -> Result<(), WatchStoreError> {
        record.progress = clamp_progress(record.progress);

        let mut all = self.list_progress();
        match all.iter().position(|p| p.movie_id == record.movie_id) {
            Some(index) => all[index] = record,
            None => all.insert(0, record),
        }
        all.truncate(MAX_PROGRESS_RECORDS);

        self.write_collection(PROGRESS_KEY, &all)
    }

    pub fn get_progress(&self, movie_id: u32) -> Option<ProgressRecord> {
        self.list_progress()
            .into_iter()
            .find(|p| p.movie_id == movie_id)
    }

    /// Delete the record for `movie_id`. No write happens when it is absent.
    pub fn remove_progress(&self, movie_id: u32) -> Result<(), WatchStoreError> {
        let mut all = self.list_progress();
        let before = all.len();
        all.retain(|p| p.movie_id != movie_id);
        if all.len() == before {
            return Ok(());
        }

        self.write_collection(PROGRESS_KEY, &all)
    }

    /// Started-but-unfinished movies, most recently watched first.
    pub fn continue_watching(&self) -> Vec<ProgressRecord> {
        let mut in_progress: Vec<ProgressRecord> = self
            .list_progress()
            .into_iter()
            .filter(|p| p.is_in_progress())
            .collect();

        in_progress.sort_by(|a, b| b.last_watched.cmp(&a.last_watched));
        in_progress.truncate(CONTINUE_WATCHING_LIMIT);
        in_progress
    }

    // =========================================================================
    // Watchlist
    // =========================================================================

    /// Watchlist entries, most recently added first.
    pub fn list_watchlist(&self) -> Vec<WatchlistEntry> {
        self.read_collection(WATCHLIST_KEY)
    }

    /// Add a movie to the front of the watchlist.
    ///
    /// Returns `false` without writing when the movie is already listed; the
    /// original `added_at` is kept.
    pub fn add_to_watchlist(&self, entry: NewWatchlistEntry) -> Result<bool, WatchStoreError> {
        let mut list = self.list_watchlist();
        if list.iter().any(|m| m.movie_id == entry.movie_id) {
            return Ok(false);
        }

        list.insert(0, entry.stamped(Utc::now()));
        self.write_collection(WATCHLIST_KEY, &list)?;
        Ok(true)
    }

    /// Remove a movie from the watchlist. No write happens when it is absent.
    pub fn remove_from_watchlist(&self, movie_id: u32) -> Result<(), WatchStoreError> {
        let mut list = self.list_watchlist();
        let before = list.len();
        list.retain(|m| m.movie_id != movie_id);
        if list.len() == before {
            return Ok(());
        }

        self.write_collection(WATCHLIST_KEY, &list)
    }

    pub fn is_in_watchlist(&self, movie_id: u32) -> bool {
        self.list_watchlist().iter().any(|m| m.movie_id == movie_id)
    }

    /// Add the movie when absent, remove it when present.
    ///
    /// Returns whether the movie is in the watchlist afterwards.
    pub fn toggle_watchlist(&self, entry: NewWatchlistEntry) -> Result<bool, WatchStoreError> {
        if self.is_in_watchlist(entry.movie_id) {
            self.remove_from_watchlist(entry.movie_id)?;
            Ok(false)
        } else {
            self.add_to_watchlist(entry)?;
            Ok(true)
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Reading {} failed, treating as empty: {}", key, e);
                metrics::STORAGE_READ_RECOVERIES
                    .with_label_values(&[key])
                    .inc();
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!("Stored {} is not readable, treating as empty: {}", key, e);
                metrics::STORAGE_READ_RECOVERIES
                    .with_label_values(&[key])
                    .inc();
                Vec::new()
            }
        }
    }

    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), WatchStoreError> {
        let json =
            serde_json::to_string(items).map_err(|e| WatchStoreError::Serialize(e.to_string()))?;

        debug!("Writing {} ({} entries, {} bytes)", key, items.len(), json.len());

        self.storage.set(key, &json).map_err(|e| {
            metrics::STORAGE_WRITE_FAILURES
                .with_label_values(&[key])
                .inc();
            WatchStoreError::from(e)
        })
    }
}

/// Clamp to [0, 100]. Non-finite input becomes 0.
fn clamp_progress(progress: f64) -> f64 {
    if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
