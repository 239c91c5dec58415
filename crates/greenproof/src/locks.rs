//! Per-action serialization of attestations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use greenproof_core::ActionId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A set of async locks keyed by action id.
///
/// Entries nobody holds or waits on are pruned on the next acquisition, so
/// the map only grows with the number of actions being attested concurrently.
#[derive(Debug, Default)]
pub struct ActionLocks {
    locks: Mutex<HashMap<ActionId, Arc<AsyncMutex<()>>>>,
}

impl ActionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`. Released when the guard drops.
    pub async fn lock(&self, id: ActionId) -> OwnedMutexGuard<()> {
        let mutex = {
            // The map is left consistent by every critical section, so a
            // poisoned lock is still safe to use.
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, m| Arc::strong_count(m) > 1);
            locks.entry(id).or_default().clone()
        };
        mutex.lock_owned().await
    }

    /// Number of tracked ids.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
