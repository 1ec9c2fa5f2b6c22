//! Watch store integration tests.
//!
//! These tests run the progress and watchlist operations against both
//! storage backends, and check the invariants that must hold for any
//! sequence of writes.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

use bloxwave_core::{
    storage::{KeyValueStore, MemoryStorage, SqliteStorage},
    testing::{fixtures, FailingStorage},
    watch::{
        NewWatchlistEntry, ProgressRecord, WatchStore, CONTINUE_WATCHING_LIMIT,
        MAX_PROGRESS_RECORDS, PROGRESS_KEY, WATCHLIST_KEY,
    },
};

/// One store per backend, sharing nothing.
struct TestHarness {
    stores: Vec<(&'static str, WatchStore)>,
    _temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let sqlite = SqliteStorage::new(&temp_dir.path().join("watch.db"))
            .expect("Failed to create sqlite storage");

        Self {
            stores: vec![
                ("memory", WatchStore::new(Arc::new(MemoryStorage::new()))),
                ("sqlite", WatchStore::new(Arc::new(sqlite))),
            ],
            _temp_dir: temp_dir,
        }
    }
}

fn record(movie_id: u32, progress: f64, current_time: u64, last_watched_min: i64) -> ProgressRecord {
    ProgressRecord {
        movie_id,
        title: format!("Movie {}", movie_id),
        poster_path: None,
        backdrop_path: None,
        progress,
        current_time,
        duration: 2000,
        last_watched: Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap()
            + Duration::minutes(last_watched_min),
    }
}

#[test]
fn test_upsert_replaces_record() {
    let harness = TestHarness::new();
    for (backend, store) in &harness.stores {
        let first = record(42, 30.0, 600, 0);
        let second = record(42, 55.0, 1100, 5);

        assert_ok!(store.save_progress(first));
        assert_ok!(store.save_progress(second.clone()));

        assert_eq!(store.get_progress(42), Some(second.clone()), "{}", backend);
        assert_eq!(store.list_progress().len(), 1, "{}", backend);
    }
}

#[test]
fn test_save_then_get_returns_same_record() {
    let harness = TestHarness::new();
    for (backend, store) in &harness.stores {
        let saved = record(7, 12.5, 250, 3);
        assert_ok!(store.save_progress(saved.clone()));
        assert_eq!(store.get_progress(7), Some(saved), "{}", backend);
    }
}

#[test]
fn test_fifty_first_record_evicts_first_inserted() {
    let harness = TestHarness::new();
    for (backend, store) in &harness.stores {
        for id in 1..=51 {
            assert_ok!(store.save_progress(record(id, 10.0, 200, i64::from(id))));
        }

        let list = store.list_progress();
        assert_eq!(list.len(), MAX_PROGRESS_RECORDS, "{}", backend);
        assert!(store.get_progress(1).is_none(), "{}", backend);
        assert_eq!(list[0].movie_id, 51, "{}", backend);
    }
}

#[test]
fn test_progress_list_bounded_and_unique() {
    let store = WatchStore::new(Arc::new(MemoryStorage::new()));

    // A deterministic mix of new ids and rewrites of old ones.
    let mut seed: u32 = 17;
    for step in 0..400 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let movie_id = seed % 90 + 1;
        let progress = f64::from(seed % 101);
        assert_ok!(store.save_progress(record(movie_id, progress, 100, step)));

        let list = store.list_progress();
        assert!(list.len() <= MAX_PROGRESS_RECORDS);
        let mut ids: Vec<u32> = list.iter().map(|r| r.movie_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), list.len());

        let resumable = store.continue_watching();
        assert!(resumable.len() <= CONTINUE_WATCHING_LIMIT);
        assert!(resumable
            .iter()
            .all(|r| r.progress > 0.0 && r.progress < 95.0));
        assert!(resumable
            .windows(2)
            .all(|w| w[0].last_watched >= w[1].last_watched));
    }
}

#[test]
fn test_watchlist_first_add_wins() {
    let harness = TestHarness::new();
    for (backend, store) in &harness.stores {
        let entry = NewWatchlistEntry::new(603, "The Matrix", Some("/m.jpg".to_string()));

        assert!(assert_ok!(store.add_to_watchlist(entry.clone())));
        let added_at = store.list_watchlist()[0].added_at;

        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(!assert_ok!(store.add_to_watchlist(entry)));

        let list = store.list_watchlist();
        assert_eq!(list.len(), 1, "{}", backend);
        assert_eq!(list[0].added_at, added_at, "{}", backend);
    }
}

#[test]
fn test_remove_absent_watchlist_entry_is_noop() {
    let harness = TestHarness::new();
    for (backend, store) in &harness.stores {
        assert_ok!(store.add_to_watchlist(NewWatchlistEntry::new(1, "Heat", None)));
        let before = store.list_watchlist();

        assert_ok!(store.remove_from_watchlist(999));
        assert_eq!(store.list_watchlist(), before, "{}", backend);
    }
}

#[test]
fn test_collections_are_independent() {
    let store = WatchStore::new(Arc::new(MemoryStorage::new()));
    assert_ok!(store.save_progress(fixtures::progress(5, 40.0)));
    assert_ok!(store.add_to_watchlist(NewWatchlistEntry::new(6, "Ronin", None)));

    assert!(!store.is_in_watchlist(5));
    assert!(store.get_progress(6).is_none());

    assert_ok!(store.remove_progress(5));
    assert!(store.is_in_watchlist(6));
}

#[test]
fn test_corrupt_blobs_read_as_empty() {
    let storage = Arc::new(MemoryStorage::new());
    let store = WatchStore::new(storage.clone());

    storage.set(PROGRESS_KEY, "[{\"movieId\": \"oops\"}]").unwrap();
    storage.set(WATCHLIST_KEY, "null").unwrap();

    assert!(store.list_progress().is_empty());
    assert!(store.list_watchlist().is_empty());

    // The next write starts a fresh collection.
    assert_ok!(store.save_progress(fixtures::progress(1, 20.0)));
    assert_eq!(store.list_progress().len(), 1);
}

#[test]
fn test_write_failures_surface() {
    let storage = Arc::new(FailingStorage::new());
    let store = WatchStore::new(storage.clone());
    assert_ok!(store.save_progress(fixtures::progress(1, 20.0)));

    storage.fail_writes(true);
    assert_err!(store.save_progress(fixtures::progress(2, 20.0)));
    assert_err!(store.add_to_watchlist(NewWatchlistEntry::new(3, "Alien", None)));

    // Nothing persisted, nothing lost.
    assert_eq!(store.list_progress().len(), 1);
    assert!(store.list_watchlist().is_empty());
}

#[test]
fn test_sqlite_state_survives_reopen() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("watch.db");

    {
        let store = WatchStore::new(Arc::new(SqliteStorage::new(&path).unwrap()));
        assert_ok!(store.save_progress(record(42, 30.0, 600, 0)));
        assert_ok!(store.add_to_watchlist(NewWatchlistEntry::new(42, "Heat", None)));
    }

    let store = WatchStore::new(Arc::new(SqliteStorage::new(&path).unwrap()));
    assert_eq!(store.get_progress(42).map(|r| r.current_time), Some(600));
    assert!(store.is_in_watchlist(42));
}
