//! Shared state handed to every API handler

use crate::registry::SubscriberRegistry;
use crate::stats::StatStore;

/// Service objects shared by all handlers
#[derive(Clone)]
pub struct ApiState {
    /// Aggregated farm stats, read for snapshots
    pub stats: StatStore,

    /// Connected WebSocket subscribers
    pub registry: SubscriberRegistry,
}

impl ApiState {
    pub fn new(stats: StatStore, registry: SubscriberRegistry) -> Self {
        Self { stats, registry }
    }
}
