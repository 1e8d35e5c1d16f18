//! Keyed entry store.
//!
//! Entries live in process memory behind an async `RwLock`. The pool handle
//! is cheaply cloneable and is shared by all handlers; data access goes
//! through the repositories in [`repositories`].

pub mod repositories;

use std::collections::HashMap;
use std::sync::Arc;

use journal_core::entry::Entry;
use journal_core::types::EntryId;
use tokio::sync::RwLock;

/// Backing storage shared by all repositories.
#[derive(Debug, Default)]
pub struct Store {
    entries: RwLock<HashMap<EntryId, Entry>>,
}

pub type DbPool = Arc<Store>;

/// Create an empty store.
pub fn create_pool() -> DbPool {
    Arc::new(Store::default())
}

/// Check that the store can be read.
///
/// Fails only if the lock cannot be acquired promptly, which indicates a
/// stuck writer.
pub async fn health_check(pool: &DbPool) -> Result<(), HealthError> {
    tokio::time::timeout(std::time::Duration::from_secs(1), pool.entries.read())
        .await
        .map(|_| ())
        .map_err(|_| HealthError::LockTimeout)
}

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("Entry store lock not acquired within 1s")]
    LockTimeout,
}
