//! Movie detail screen.

use tracing::{debug, warn};

use super::format::playback_status;
use crate::catalog::{Movie, MovieCatalog, MovieDetails};
use crate::config::PlaybackConfig;
use crate::watch::{
    NewWatchlistEntry, PlaybackSession, PlaybackTarget, WatchStore, WatchStoreError,
};

/// A loaded detail screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub details: MovieDetails,
    /// Related movies; empty when that call failed.
    pub similar: Vec<Movie>,
    /// Stored progress percentage, 0 when the movie was never started.
    pub progress: f64,
    pub in_watchlist: bool,
}

impl DetailView {
    pub fn movie_id(&self) -> u32 {
        self.details.movie.id
    }

    /// Label of the play button.
    pub fn play_label(&self) -> &'static str {
        if self.progress > 0.0 {
            "Continue Watching"
        } else {
            "Watch Now"
        }
    }

    /// Re-read progress and watchlist membership from the store.
    pub fn refresh_local(&mut self, store: &WatchStore) {
        let movie_id = self.movie_id();
        self.progress = store.get_progress(movie_id).map_or(0.0, |p| p.progress);
        self.in_watchlist = store.is_in_watchlist(movie_id);
    }

    /// Start simulated playback of this movie.
    pub fn play(&self, store: &WatchStore, config: &PlaybackConfig) -> PlaybackSession {
        PlaybackSession::start(store.clone(), PlaybackTarget::from(&self.details), config)
    }

    /// Overlay text for a running session, e.g. "0:42 / 2h 16m".
    pub fn playback_label(&self, session: &PlaybackSession) -> String {
        playback_status(session.current_time(), session.duration())
    }
}

/// What the detail route resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    Found(Box<DetailView>),
    NotFound,
}

/// Load the detail screen for a movie.
///
/// Details and similar movies are fetched concurrently. Id 0 issues no
/// request, and any details failure renders as not found.
pub async fn load_detail(
    catalog: &dyn MovieCatalog,
    store: &WatchStore,
    movie_id: u32,
) -> DetailOutcome {
    if movie_id == 0 {
        return DetailOutcome::NotFound;
    }

    let (details, similar) = futures::join!(
        catalog.movie_details(movie_id),
        catalog.similar(movie_id)
    );

    let details = match details {
        Ok(details) => details,
        Err(e) => {
            debug!("Movie {} unavailable: {}", movie_id, e);
            return DetailOutcome::NotFound;
        }
    };

    let similar = similar.map(|page| page.results).unwrap_or_else(|e| {
        warn!("Similar movies for {} failed: {}", movie_id, e);
        Vec::new()
    });

    let mut view = DetailView {
        details,
        similar,
        progress: 0.0,
        in_watchlist: false,
    };
    view.refresh_local(store);
    DetailOutcome::Found(Box::new(view))
}

/// Add the movie to the watchlist when absent, remove it when present.
///
/// Returns the new membership. On a storage error the view keeps its
/// previous membership.
pub fn toggle_watchlist(store: &WatchStore, view: &mut DetailView) -> Result<bool, WatchStoreError> {
    let movie = &view.details.movie;
    let entry = NewWatchlistEntry::new(movie.id, movie.title.clone(), movie.poster_path.clone());
    let in_watchlist = store.toggle_watchlist(entry)?;
    view.in_watchlist = in_watchlist;
    Ok(in_watchlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::storage::MemoryStorage;
    use crate::testing::{fixtures, FailingStorage, MockCatalog};
    use std::sync::Arc;

    fn memory_store() -> WatchStore {
        WatchStore::new(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_found_with_local_state() {
        let catalog = MockCatalog::new();
        catalog
            .add_details(fixtures::movie_details(603, "The Matrix"))
            .await;
        catalog
            .set_similar(603, fixtures::page(1, 1, fixtures::movies(604, 2)))
            .await;
        let store = memory_store();
        store.save_progress(fixtures::progress(603, 42.0)).unwrap();

        let DetailOutcome::Found(view) = load_detail(&catalog, &store, 603).await else {
            panic!("expected details");
        };
        assert_eq!(view.details.movie.title, "The Matrix");
        assert_eq!(view.similar.len(), 2);
        assert_eq!(view.progress, 42.0);
        assert_eq!(view.play_label(), "Continue Watching");
        assert!(!view.in_watchlist);
    }

    #[tokio::test]
    async fn test_playback_label_resumes_from_stored_position() {
        let catalog = MockCatalog::new();
        catalog
            .add_details(fixtures::movie_details(603, "The Matrix"))
            .await;
        let store = memory_store();
        let mut stored = fixtures::progress(603, 1.0);
        stored.current_time = 42;
        store.save_progress(stored).unwrap();

        let DetailOutcome::Found(view) = load_detail(&catalog, &store, 603).await else {
            panic!("expected details");
        };
        let config = PlaybackConfig {
            tick_interval_ms: 60_000,
            fallback_runtime_minutes: 120,
        };
        let session = view.play(&store, &config);
        assert_eq!(view.playback_label(&session), "0:42 / 2h 16m");
        session.stop().await;
    }

    #[tokio::test]
    async fn test_not_found_cases() {
        let catalog = MockCatalog::new();
        let store = memory_store();

        assert_eq!(load_detail(&catalog, &store, 0).await, DetailOutcome::NotFound);
        assert_eq!(catalog.query_count().await, 0);

        assert_eq!(load_detail(&catalog, &store, 77).await, DetailOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_found() {
        let catalog = MockCatalog::new();
        let store = memory_store();
        // Details is polled first by join!, so it takes the injected error.
        catalog
            .add_details(fixtures::movie_details(78, "Up"))
            .await;
        catalog
            .set_next_error(CatalogError::Api {
                status: 503,
                message: "down".to_string(),
            })
            .await;

        assert_eq!(load_detail(&catalog, &store, 78).await, DetailOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_similar_failure_is_soft() {
        let catalog = MockCatalog::new();
        catalog
            .add_details(fixtures::movie_details(603, "The Matrix"))
            .await;
        let store = memory_store();

        let DetailOutcome::Found(view) = load_detail(&catalog, &store, 603).await else {
            panic!("expected details");
        };
        assert!(view.similar.is_empty());
        assert_eq!(view.play_label(), "Watch Now");
    }

    #[test]
    fn test_toggle_watchlist() {
        let store = memory_store();
        let mut view = DetailView {
            details: fixtures::movie_details(603, "The Matrix"),
            similar: vec![],
            progress: 0.0,
            in_watchlist: false,
        };

        assert!(toggle_watchlist(&store, &mut view).unwrap());
        assert!(store.is_in_watchlist(603));
        assert_eq!(store.list_watchlist()[0].poster_path.as_deref(), Some("/poster-603.jpg"));

        assert!(!toggle_watchlist(&store, &mut view).unwrap());
        assert!(!view.in_watchlist);
        assert!(store.list_watchlist().is_empty());
    }

    #[test]
    fn test_toggle_failure_keeps_membership() {
        let storage = Arc::new(FailingStorage::new());
        storage.fail_writes(true);
        let store = WatchStore::new(storage);
        let mut view = DetailView {
            details: fixtures::movie_details(603, "The Matrix"),
            similar: vec![],
            progress: 0.0,
            in_watchlist: false,
        };

        assert!(toggle_watchlist(&store, &mut view).is_err());
        assert!(!view.in_watchlist);
    }
}
