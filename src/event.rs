//! Activity events emitted by the game server plugin
//!
//! The producer sends one JSON object per datagram:
//!
//! ```json
//! {"category": 2, "timestamp": 1000, "id_subject": "A", "id_object": "B", "quantity": 5}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{HubError, HubResult};

/// Subject of a World event announcing a crate on the cargo ship
pub const CARGO_SHIP_CRATE_SPAWN: &str = "OnCargoShipSpawnCrate";

/// Event category as sent on the wire
///
/// Unknown values are kept so they can be logged, but they never affect the aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Category {
    #[default]
    PvP,
    PvE,
    Farm,
    World,
    Other(i64),
}

impl From<i64> for Category {
    fn from(value: i64) -> Self {
        match value {
            0 => Category::PvP,
            1 => Category::PvE,
            2 => Category::Farm,
            3 => Category::World,
            other => Category::Other(other),
        }
    }
}

impl From<Category> for i64 {
    fn from(category: Category) -> Self {
        match category {
            Category::PvP => 0,
            Category::PvE => 1,
            Category::Farm => 2,
            Category::World => 3,
            Category::Other(other) => other,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::PvP => write!(f, "PvP"),
            Category::PvE => write!(f, "PvE"),
            Category::Farm => write!(f, "Farm"),
            Category::World => write!(f, "World"),
            Category::Other(value) => write!(f, "unknown({value})"),
        }
    }
}

/// A single decoded activity event
///
/// Missing fields decode to their zero value, so a World event without
/// `quantity` still counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityEvent {
    pub category: Category,

    /// Seconds since the Unix epoch
    pub timestamp: u64,

    /// Entity causing the event
    #[serde(rename = "id_subject")]
    pub subject: String,

    /// Entity affected by the event
    #[serde(rename = "id_object")]
    pub object: String,

    /// Only meaningful for [`Category::Farm`]
    pub quantity: u64,
}

impl ActivityEvent {
    /// Decode a raw datagram payload
    pub fn decode(payload: &[u8]) -> HubResult<Self> {
        serde_json::from_slice(payload).map_err(HubError::Decode)
    }

    pub fn is_cargo_ship_crate_spawn(&self) -> bool {
        self.category == Category::World && self.subject == CARGO_SHIP_CRATE_SPAWN
    }
}
