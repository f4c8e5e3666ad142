//! Process-wide serialization of cart operations per owner.
//!
//! Two reservation or checkout calls for the same owner never interleave inside this
//! process. Calls for different owners never wait on each other. This only shortcuts
//! contention on the owner's own rows; the `FOR UPDATE` row locks taken inside each
//! transaction remain what keeps stock correct across processes.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Held for the duration of one operation; dropping it lets the next waiter in.
pub type OwnerGuard = OwnedMutexGuard<()>;

#[derive(Debug, Default)]
pub struct OwnerLocks {
    // Entries are never evicted: the key space is bounded by active owners.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl OwnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other guard for `owner` is alive. Waiters are admitted in FIFO order.
    pub async fn acquire(&self, owner: &str) -> OwnerGuard {
        self.lock_for(owner).lock_owned().await
    }

    /// Number of owners that have ever acquired a lock.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    fn lock_for(&self, owner: &str) -> Arc<Mutex<()>> {
        if let Some(existing) = self.locks.get(owner) {
            return Arc::clone(existing.value());
        }
        // The shard guard is released at the end of this statement, before any await.
        Arc::clone(
            self.locks
                .entry(owner.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }
}
