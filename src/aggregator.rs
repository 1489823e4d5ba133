//! Applies decoded activity events to the stat store
//!
//! ## Category dispatch
//!
//! ```text
//! Farm   -> accumulate quantity for (subject, object)
//! PvP    -> log only
//! PvE    -> log only
//! World  -> alert when subject == "OnCargoShipSpawnCrate"
//! other  -> ignored
//! ```

use std::sync::Arc;

use chrono::DateTime;
use tracing::{debug, info, instrument, trace};

use crate::discord::Notifier;
use crate::event::{ActivityEvent, Category};
use crate::stats::{Stat, StatStore};

/// Alert text sent when a crate spawns on the cargo ship
pub const CARGO_SHIP_ALERT: &str = "Crate spawned on Cargo Ship!";

/// What applying one event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A farm stat was updated
    Accumulated(Stat),

    /// An alert was dispatched (delivered or not)
    Alerted,

    /// Nothing changed
    Ignored,
}

#[derive(Clone)]
pub struct Aggregator {
    stats: StatStore,
    notifier: Arc<dyn Notifier>,
}

impl Aggregator {
    pub fn new(stats: StatStore, notifier: Arc<dyn Notifier>) -> Self {
        Self { stats, notifier }
    }

    pub fn stats(&self) -> &StatStore {
        &self.stats
    }

    #[instrument(skip_all, fields(category = %event.category))]
    pub async fn apply(&self, event: &ActivityEvent) -> Outcome {
        match event.category {
            Category::PvP | Category::PvE => {
                debug!(
                    "got a {} event: {} -> {}",
                    event.category, event.subject, event.object
                );
                Outcome::Ignored
            }
            Category::Farm => {
                let stat = self.stats.accumulate(
                    &event.subject,
                    &event.object,
                    event.quantity,
                    event.timestamp,
                );
                info!(
                    "farm stats accumulated: {} -> {}: total {} (from {} to {})",
                    event.subject,
                    event.object,
                    stat.quantity,
                    as_date_iso(stat.first_seen),
                    as_date_iso(stat.last_seen)
                );
                Outcome::Accumulated(stat)
            }
            Category::World if event.is_cargo_ship_crate_spawn() => {
                info!("alerting Discord: cargo ship crate spawned");
                // delivery failures are logged by the notifier
                let _ = self.notifier.notify(CARGO_SHIP_ALERT).await;
                Outcome::Alerted
            }
            Category::World | Category::Other(_) => {
                trace!("ignoring {} event from {}", event.category, event.subject);
                Outcome::Ignored
            }
        }
    }
}

fn as_date_iso(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|date| date.to_rfc3339())
        .unwrap_or_else(|| timestamp.to_string())
}
