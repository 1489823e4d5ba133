//! API response types

use serde::{Deserialize, Serialize};

/// Response for GET /api/v1/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,

    /// Number of currently registered WebSocket subscribers
    pub subscribers: usize,
}
