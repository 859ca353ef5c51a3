//! Set of sensor identifiers already announced during this process lifetime.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe, append-mostly set of announced sensor ids.
///
/// [`insert`](Self::insert) is a single check-and-insert under the lock, so
/// two concurrent callers can never both claim the same `sid`.
#[derive(Debug, Default)]
pub struct PropagatedSet {
    sids: Mutex<HashSet<String>>,
}

impl PropagatedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `sid`, returning `true` if it was not already present.
    pub fn insert(&self, sid: &str) -> bool {
        let mut sids = self.lock();
        if sids.contains(sid) {
            return false;
        }
        sids.insert(sid.to_string())
    }

    #[must_use]
    pub fn contains(&self, sid: &str) -> bool {
        self.lock().contains(sid)
    }

    /// Drop `sid`, returning whether it was present.
    pub fn remove(&self, sid: &str) -> bool {
        self.lock().remove(sid)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the set half-updated.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.sids.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
