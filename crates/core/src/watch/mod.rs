//! Local watch state: progress tracking, the watchlist and simulated playback.

mod session;
mod store;
mod types;

pub use session::{PlaybackSession, PlaybackTarget};
pub use store::WatchStore;
pub use types::{NewWatchlistEntry, ProgressRecord, WatchlistEntry};

use thiserror::Error;

use crate::storage::StorageError;

/// Storage key holding the progress records array.
pub const PROGRESS_KEY: &str = "bloxwave_watch_progress";

/// Storage key holding the watchlist array.
pub const WATCHLIST_KEY: &str = "bloxwave_watch_list";

/// Most progress records kept; the last one by position is evicted first.
pub const MAX_PROGRESS_RECORDS: usize = 50;

/// Most entries returned by [`WatchStore::continue_watching`].
pub const CONTINUE_WATCHING_LIMIT: usize = 10;

/// Progress percentage at which a movie counts as finished.
pub const COMPLETION_THRESHOLD: f64 = 95.0;

/// Errors from watch store writes.
#[derive(Debug, Error)]
pub enum WatchStoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to serialize watch state: {0}")]
    Serialize(String),
}
