//! Repository for journal entries.

use journal_core::entry::{Entry, EntryPatch, EntryValidationError};
use journal_core::types::EntryId;

use crate::DbPool;

/// Provides data access for journal entries.
pub struct EntryRepo;

impl EntryRepo {
    /// Store a new entry, returning a copy of it.
    pub async fn create(pool: &DbPool, entry: Entry) -> Entry {
        let mut entries = pool.entries.write().await;
        entries.insert(entry.id(), entry.clone());
        tracing::debug!(entry_id = %entry.id(), total = entries.len(), "Entry stored");
        entry
    }

    /// Find an entry by its ID.
    pub async fn find_by_id(pool: &DbPool, id: EntryId) -> Option<Entry> {
        pool.entries.read().await.get(&id).cloned()
    }

    /// List entries, newest first, with pagination.
    pub async fn list(pool: &DbPool, limit: usize, offset: usize) -> Vec<Entry> {
        let entries = pool.entries.read().await;
        let mut all: Vec<&Entry> = entries.values().collect();
        all.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        all.into_iter().skip(offset).take(limit).cloned().collect()
    }

    /// Number of stored entries.
    pub async fn count(pool: &DbPool) -> usize {
        pool.entries.read().await.len()
    }

    /// Apply a partial update to an entry.
    ///
    /// Returns `Ok(None)` if no entry has this ID. A patch that fails
    /// validation leaves the stored entry unchanged.
    pub async fn update(
        pool: &DbPool,
        id: EntryId,
        patch: &EntryPatch,
    ) -> Result<Option<Entry>, EntryValidationError> {
        let mut entries = pool.entries.write().await;
        let Some(entry) = entries.get_mut(&id) else {
            return Ok(None);
        };
        let changed = entry.apply_patch(patch)?;
        if changed {
            tracing::debug!(entry_id = %id, "Entry updated");
        }
        Ok(Some(entry.clone()))
    }

    /// Delete an entry. Returns `true` if a row was removed.
    pub async fn delete(pool: &DbPool, id: EntryId) -> bool {
        pool.entries.write().await.remove(&id).is_some()
    }

    /// Delete every entry, returning how many were removed.
    pub async fn delete_all(pool: &DbPool) -> usize {
        let mut entries = pool.entries.write().await;
        let removed = entries.len();
        entries.clear();
        removed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
