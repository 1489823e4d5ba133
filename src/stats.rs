//! In-memory aggregate of farm statistics
//!
//! Stats are keyed by subject, then object. Entries are created on the first
//! farm event for a key and live for the rest of the process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::{HubError, HubResult};

/// Cumulative statistic for one (subject, object) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    /// Sum of all farmed quantities
    pub quantity: u64,

    /// Timestamp of the first contributing event
    pub first_seen: u64,

    /// Timestamp of the most recently applied event
    pub last_seen: u64,
}

/// Serializable copy of the whole store: subject -> object -> stat
pub type Snapshot = HashMap<String, HashMap<String, Stat>>;

/// Shared stat store
///
/// Cloning is cheap and every clone refers to the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct StatStore {
    inner: Arc<Mutex<Snapshot>>,
}

impl StatStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        // a panic while holding the lock cannot leave a half-applied stat behind
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `quantity` to the stat for (subject, object) and return the updated stat
    ///
    /// `last_seen` follows arrival order, not timestamp order.
    pub fn accumulate(&self, subject: &str, object: &str, quantity: u64, timestamp: u64) -> Stat {
        let mut stats = self.lock();
        let stat = stats
            .entry(subject.to_string())
            .or_default()
            .entry(object.to_string())
            .or_insert(Stat {
                quantity: 0,
                first_seen: timestamp,
                last_seen: timestamp,
            });

        stat.quantity = stat.quantity.saturating_add(quantity);
        stat.last_seen = timestamp;
        *stat
    }

    /// Get the stat for (subject, object), if any farm event was applied for it
    pub fn get(&self, subject: &str, object: &str) -> Option<Stat> {
        self.lock()
            .get(subject)
            .and_then(|objects| objects.get(object))
            .copied()
    }

    /// Copy the whole store
    pub fn snapshot(&self) -> Snapshot {
        self.lock().clone()
    }

    /// Serialize the whole store for a subscriber
    pub fn snapshot_json(&self) -> HubResult<String> {
        let snapshot = self.snapshot();
        serde_json::to_string(&snapshot).map_err(HubError::Serialization)
    }

    /// Number of (subject, object) pairs tracked
    pub fn len(&self) -> usize {
        self.lock().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
