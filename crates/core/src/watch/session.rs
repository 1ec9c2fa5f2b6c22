//! Simulated playback that records progress once per tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use super::store::WatchStore;
use super::types::ProgressRecord;
use crate::catalog::MovieDetails;
use crate::config::PlaybackConfig;
use crate::metrics;

/// The movie being played, with the snapshot fields progress records keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackTarget {
    pub movie_id: u32,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub runtime_minutes: Option<u32>,
}

impl From<&MovieDetails> for PlaybackTarget {
    fn from(details: &MovieDetails) -> Self {
        Self {
            movie_id: details.movie.id,
            title: details.movie.title.clone(),
            poster_path: details.movie.poster_path.clone(),
            backdrop_path: details.movie.backdrop_path.clone(),
            runtime_minutes: details.runtime_minutes,
        }
    }
}

/// Handle to a running playback session.
///
/// Each tick advances playback by one second and saves a progress record.
/// Once `stop` has returned no further tick fires. Dropping the handle only
/// aborts the task: on a multi-thread runtime a tick that is already saving
/// may still finish after `drop` returns.
pub struct PlaybackSession {
    movie_id: u32,
    duration: u64,
    position: Arc<AtomicU64>,
    cancel_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PlaybackSession {
    /// Start ticking. Must be called from within a tokio runtime.
    ///
    /// Playback resumes from the stored position for this movie, or from
    /// the start when there is none or the stored one is already at the end.
    pub fn start(store: WatchStore, target: PlaybackTarget, config: &PlaybackConfig) -> Self {
        let runtime = target
            .runtime_minutes
            .filter(|&m| m > 0)
            .unwrap_or(config.fallback_runtime_minutes);
        let duration = u64::from(runtime) * 60;

        let resume_at = store
            .get_progress(target.movie_id)
            .map(|p| p.current_time)
            .filter(|&t| t < duration)
            .unwrap_or(0);

        info!(
            "Starting playback of movie {} at {}s of {}s",
            target.movie_id, resume_at, duration
        );

        let movie_id = target.movie_id;
        let position = Arc::new(AtomicU64::new(resume_at));
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let interval = Duration::from_millis(config.tick_interval_ms.max(1));

        let task = tokio::spawn(run_ticks(
            store,
            target,
            duration,
            Arc::clone(&position),
            interval,
            cancel_rx,
        ));

        Self {
            movie_id,
            duration,
            position,
            cancel_tx: Some(cancel_tx),
            task: Some(task),
        }
    }

    pub fn movie_id(&self) -> u32 {
        self.movie_id
    }

    /// Total simulated duration in seconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Elapsed simulated playback in seconds.
    pub fn current_time(&self) -> u64 {
        self.position.load(Ordering::SeqCst)
    }

    /// Whether the tick task is still alive.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the tick task and wait for it to exit.
    pub async fn stop(mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Playback task for movie {} ended abnormally: {}", self.movie_id, e);
            }
        }
        info!(
            "Stopped playback of movie {} at {}s",
            self.movie_id,
            self.current_time()
        );
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        // Ticks only write between await points, so aborting never leaves a
        // half-written record behind.
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_ticks(
    store: WatchStore,
    target: PlaybackTarget,
    duration: u64,
    position: Arc<AtomicU64>,
    interval: Duration,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = &mut cancel_rx => break,
            _ = ticker.tick() => {}
        }

        let current_time = position.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::PLAYBACK_TICKS.inc();

        let record = ProgressRecord {
            movie_id: target.movie_id,
            title: target.title.clone(),
            poster_path: target.poster_path.clone(),
            backdrop_path: target.backdrop_path.clone(),
            progress: current_time as f64 / duration as f64 * 100.0,
            current_time,
            duration,
            last_watched: Utc::now(),
        };

        if let Err(e) = store.save_progress(record) {
            warn!(
                "Failed to record progress for movie {}: {}",
                target.movie_id, e
            );
        }

        if current_time >= duration {
            info!("Playback of movie {} reached the end", target.movie_id);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::{fixtures, FailingStorage};

    fn fast_config() -> PlaybackConfig {
        PlaybackConfig {
            tick_interval_ms: 5,
            fallback_runtime_minutes: 120,
        }
    }

    fn target(runtime_minutes: Option<u32>) -> PlaybackTarget {
        PlaybackTarget {
            movie_id: 42,
            title: "Heat".to_string(),
            poster_path: Some("/heat.jpg".to_string()),
            backdrop_path: None,
            runtime_minutes,
        }
    }

    #[tokio::test]
    async fn test_ticks_record_progress() {
        let store = WatchStore::new(Arc::new(MemoryStorage::new()));
        let session = PlaybackSession::start(store.clone(), target(Some(100)), &fast_config());
        assert_eq!(session.duration(), 6000);

        tokio::time::sleep(Duration::from_millis(100)).await;
        session.stop().await;

        let record = store.get_progress(42).unwrap();
        assert!(record.current_time > 0);
        assert_eq!(record.duration, 6000);
        assert_eq!(record.title, "Heat");
        assert_eq!(record.poster_path.as_deref(), Some("/heat.jpg"));
        let expected = record.current_time as f64 / 6000.0 * 100.0;
        assert!((record.progress - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_no_tick_after_stop() {
        let store = WatchStore::new(Arc::new(MemoryStorage::new()));
        let session = PlaybackSession::start(store.clone(), target(Some(100)), &fast_config());

        tokio::time::sleep(Duration::from_millis(50)).await;
        session.stop().await;
        let stopped_at = store.get_progress(42).unwrap().current_time;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.get_progress(42).unwrap().current_time, stopped_at);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_no_tick_after_stop_on_worker_threads() {
        let store = WatchStore::new(Arc::new(MemoryStorage::new()));
        let session = PlaybackSession::start(store.clone(), target(Some(100)), &fast_config());

        tokio::time::sleep(Duration::from_millis(40)).await;
        session.stop().await;
        let stopped_at = store.get_progress(42).map(|p| p.current_time);
        assert!(stopped_at.is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(store.get_progress(42).map(|p| p.current_time), stopped_at);
    }

    #[tokio::test]
    async fn test_no_tick_after_drop() {
        let store = WatchStore::new(Arc::new(MemoryStorage::new()));
        let session = PlaybackSession::start(store.clone(), target(Some(100)), &fast_config());

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(session);
        // Let the runtime process the abort.
        tokio::task::yield_now().await;
        let dropped_at = store.get_progress(42).map(|p| p.current_time);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.get_progress(42).map(|p| p.current_time), dropped_at);
    }

    #[tokio::test]
    async fn test_resumes_from_stored_position() {
        let store = WatchStore::new(Arc::new(MemoryStorage::new()));
        let mut stored = fixtures::progress(42, 10.0);
        stored.current_time = 600;
        store.save_progress(stored).unwrap();

        let session = PlaybackSession::start(store.clone(), target(Some(100)), &fast_config());
        assert!(session.current_time() >= 600);
        tokio::time::sleep(Duration::from_millis(30)).await;
        session.stop().await;

        assert!(store.get_progress(42).unwrap().current_time > 600);
    }

    #[tokio::test]
    async fn test_fallback_runtime() {
        let store = WatchStore::new(Arc::new(MemoryStorage::new()));
        let session = PlaybackSession::start(store, target(None), &fast_config());
        assert_eq!(session.duration(), 120 * 60);
        session.stop().await;
    }

    #[tokio::test]
    async fn test_session_ends_at_duration() {
        let store = WatchStore::new(Arc::new(MemoryStorage::new()));
        let mut stored = fixtures::progress(42, 99.0);
        stored.current_time = 59 * 60 - 2;
        store.save_progress(stored).unwrap();

        let session = PlaybackSession::start(store.clone(), target(Some(59)), &fast_config());
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!session.is_running());
        let record = store.get_progress(42).unwrap();
        assert_eq!(record.current_time, 59 * 60);
        assert_eq!(record.progress, 100.0);
        session.stop().await;
    }

    #[tokio::test]
    async fn test_write_failures_do_not_end_session() {
        let storage = Arc::new(FailingStorage::new());
        storage.fail_writes(true);
        let store = WatchStore::new(storage.clone());

        let session = PlaybackSession::start(store, target(Some(100)), &fast_config());
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(session.is_running());
        assert!(session.current_time() > 0);
        session.stop().await;
    }
}
