//! Profile screen: continue-watching and watchlist snapshots.

use serde::Serialize;

use super::format::watch_summary;
use crate::catalog::{ImageSize, ImageUrls};
use crate::watch::{ProgressRecord, WatchStore, WatchStoreError, WatchlistEntry};

/// A started movie, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressCard {
    pub movie_id: u32,
    pub title: String,
    /// Backdrop when there is one, else the poster; empty when neither.
    pub thumbnail_url: String,
    pub progress: f64,
    pub summary: String,
    pub path: String,
}

impl ProgressCard {
    pub fn new(record: &ProgressRecord, images: &ImageUrls) -> Self {
        let thumbnail_url = match record.backdrop_path.as_deref() {
            Some(backdrop) if !backdrop.is_empty() => {
                images.url(Some(backdrop), ImageSize::W300)
            }
            _ => images.url(record.poster_path.as_deref(), ImageSize::W200),
        };

        Self {
            movie_id: record.movie_id,
            title: record.title.clone(),
            thumbnail_url,
            progress: record.progress,
            summary: watch_summary(record),
            path: format!("/movie/{}", record.movie_id),
        }
    }
}

/// A watchlist entry, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchlistCard {
    pub movie_id: u32,
    pub title: String,
    pub poster_url: String,
    pub path: String,
}

impl WatchlistCard {
    pub fn new(entry: &WatchlistEntry, images: &ImageUrls) -> Self {
        Self {
            movie_id: entry.movie_id,
            title: entry.title.clone(),
            poster_url: images.url(entry.poster_path.as_deref(), ImageSize::W300),
            path: format!("/movie/{}", entry.movie_id),
        }
    }
}

/// Profile screen state.
///
/// Snapshots are read when the screen is built and recomputed after each
/// removal made through it.
pub struct ProfileScreen {
    store: WatchStore,
    images: ImageUrls,
    continue_watching: Vec<ProgressCard>,
    watchlist: Vec<WatchlistCard>,
}

impl ProfileScreen {
    pub fn new(store: WatchStore, images: ImageUrls) -> Self {
        let mut screen = Self {
            store,
            images,
            continue_watching: Vec::new(),
            watchlist: Vec::new(),
        };
        screen.reload();
        screen
    }

    pub fn continue_watching(&self) -> &[ProgressCard] {
        &self.continue_watching
    }

    pub fn watchlist(&self) -> &[WatchlistCard] {
        &self.watchlist
    }

    /// Re-read both snapshots from the store.
    pub fn reload(&mut self) {
        self.continue_watching = self
            .store
            .continue_watching()
            .iter()
            .map(|r| ProgressCard::new(r, &self.images))
            .collect();
        self.watchlist = self
            .store
            .list_watchlist()
            .iter()
            .map(|e| WatchlistCard::new(e, &self.images))
            .collect();
    }

    pub fn remove_progress(&mut self, movie_id: u32) -> Result<(), WatchStoreError> {
        let result = self.store.remove_progress(movie_id);
        self.reload();
        result
    }

    pub fn remove_from_watchlist(&mut self, movie_id: u32) -> Result<(), WatchStoreError> {
        let result = self.store.remove_from_watchlist(movie_id);
        self.reload();
        result
    }
}
