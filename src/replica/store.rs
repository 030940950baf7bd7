//! In-memory append-only log held by one replica
//!
//! Entries are kept in arrival order. The local sequence number of an entry
//! is its 1-based position, so as long as the coordinator delivers entries
//! one at a time it matches the coordinator's sequence number.
//!
//! There is no deduplication: delivering the same content twice appends twice.

use crate::common::{Candidate, Entry, METRICS};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe, cloneable handle to a replica's log
#[derive(Debug, Clone, Default)]
pub struct ReplicaStore {
    entries: Arc<RwLock<Vec<Entry>>>,
}

impl ReplicaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate at the end of the log and return the stored entry.
    pub fn append(&self, candidate: Candidate) -> Entry {
        let mut entries = self.write();
        let entry = candidate.commit(entries.len() as u64 + 1);
        entries.push(entry.clone());
        METRICS.replica_log_entries.set(entries.len() as u64);
        entry
    }

    /// Point-in-time copy of the log
    pub fn list(&self) -> Vec<Entry> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave a half-pushed entry behind,
    // so a poisoned lock still guards a consistent log.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Entry>> {
        self.entries.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Entry>> {
        self.entries.write().unwrap_or_else(|p| p.into_inner())
    }
}
