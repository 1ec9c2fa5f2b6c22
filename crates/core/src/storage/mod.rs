//! Key-value persistence substrate for local watch state.
//!
//! Stands in for browser local storage: string keys mapped to string
//! values, with no locking across read-modify-write cycles. Two logically
//! concurrent writers to the same key race and the last one wins.

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use std::sync::Arc;

use thiserror::Error;

use crate::config::{StorageBackend, StorageConfig};

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is disabled or cannot be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Writing the value would exceed the storage quota.
    #[error("Storage quota exceeded writing {key}: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Create the storage backend selected in configuration.
pub fn create_storage(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match config.backend {
        StorageBackend::Memory => {
            let storage = match config.quota_bytes {
                Some(quota) => MemoryStorage::with_quota(quota),
                None => MemoryStorage::new(),
            };
            Ok(Arc::new(storage))
        }
        StorageBackend::Sqlite => Ok(Arc::new(SqliteStorage::new(&config.path)?)),
    }
}
