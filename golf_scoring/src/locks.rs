//! Per-competition serialization.
//!
//! Finalizing a competition and mutating any scorecard in it must not
//! interleave. Within one process both paths first take the competition's
//! guard from a shared [`CompetitionLocks`] registry. The store then runs
//! the read-modify-write itself under its own exclusive section (a row lock
//! on the competition for PostgreSQL), which also orders separate processes.

use crate::competition::CompetitionId;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry handing out one async mutex per competition
#[derive(Clone, Default)]
pub struct CompetitionLocks {
    locks: Arc<Mutex<HashMap<CompetitionId, Arc<Mutex<()>>>>>,
}

impl CompetitionLocks {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a competition
    ///
    /// Entries nobody holds or waits on are dropped here, so the registry
    /// only tracks competitions that are currently contended.
    pub async fn acquire(&self, competition_id: CompetitionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(competition_id).or_default())
        };
        lock.lock_owned().await
    }
}
