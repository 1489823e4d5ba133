//! Game activity stats hub
//!
//! Receives activity events from a game server plugin over a Unix datagram
//! socket, aggregates farm statistics in memory, alerts Discord when a crate
//! spawns on the cargo ship and streams every raw event to WebSocket
//! subscribers, who can request a stats snapshot at any time.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod discord;
pub mod error;
pub mod event;
pub mod ingest;
pub mod registry;
pub mod stats;

pub use aggregator::{Aggregator, Outcome};
pub use error::{HubError, HubResult};
pub use event::{ActivityEvent, Category};
pub use registry::{Subscriber, SubscriberId, SubscriberRegistry};
pub use stats::{Stat, StatStore};
