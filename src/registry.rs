//! Registry of connected subscribers and raw event fan-out
//!
//! A subscriber is only ever removed by the task serving its connection. A
//! failed send during [`SubscriberRegistry::broadcast`] is logged and the
//! handle stays registered until that task notices the disconnect.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::HubResult;

/// Identifies one registered subscriber
pub type SubscriberId = u64;

/// Send side of one subscriber connection
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Send one text frame
    async fn send_text(&self, text: String) -> HubResult<()>;
}

/// Result of a single broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Shared set of subscriber handles
#[derive(Clone, Default)]
pub struct SubscriberRegistry {
    subscribers: Arc<RwLock<HashMap<SubscriberId, Arc<dyn Subscriber>>>>,
    next_id: Arc<AtomicU64>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber and return the id used to remove it again
    pub async fn register(&self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.write().await.insert(id, subscriber);
        debug!(subscriber = id, "subscriber registered");
        id
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub async fn unregister(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.write().await.remove(&id).is_some();
        if removed {
            debug!(subscriber = id, "subscriber unregistered");
        }
        removed
    }

    /// Send `payload` to every subscriber registered when the call starts
    pub async fn broadcast(&self, payload: &str) -> BroadcastReport {
        let targets: Vec<(SubscriberId, Arc<dyn Subscriber>)> = {
            let subscribers = self.subscribers.read().await;
            subscribers
                .iter()
                .map(|(id, subscriber)| (*id, subscriber.clone()))
                .collect()
        };

        let mut report = BroadcastReport::default();
        for (id, subscriber) in targets {
            match subscriber.send_text(payload.to_string()).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(subscriber = id, "broadcast failed: {e}");
                    report.failed += 1;
                }
            }
        }
        report
    }

    pub async fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.read().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.subscribers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
