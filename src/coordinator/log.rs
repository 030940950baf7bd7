//! Coordinator log: the system of record for committed entries
//!
//! The log is also the only source of sequence numbers. A number is handed
//! out inside the same critical section that pushes the entry, so committed
//! sequence numbers are strictly increasing and gapless.

use crate::common::{Candidate, Entry, METRICS};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct CoordinatorLog {
    entries: RwLock<Vec<Entry>>,
}

impl CoordinatorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next sequence number to `candidate` and append it.
    pub fn append(&self, candidate: Candidate) -> Entry {
        let mut entries = self.write();
        let entry = candidate.commit(entries.len() as u64 + 1);
        entries.push(entry.clone());
        METRICS.coordinator_log_entries.set(entries.len() as u64);
        entry
    }

    /// Point-in-time copy of every committed entry, in commit order
    pub fn list(&self) -> Vec<Entry> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Sequence number of the most recent commit, 0 when empty
    pub fn last_sequence(&self) -> u64 {
        self.read().last().map_or(0, |e| e.sequence_number)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Entry>> {
        self.entries.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Entry>> {
        self.entries.write().unwrap_or_else(|p| p.into_inner())
    }
}
