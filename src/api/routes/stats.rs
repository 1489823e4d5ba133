//! Farm statistics endpoint

use axum::{Json, extract::State};

use crate::api::state::ApiState;
use crate::stats::Snapshot;

/// GET /api/v1/stats
///
/// Same payload a WebSocket subscriber gets in reply to `init`
pub async fn get_stats(State(state): State<ApiState>) -> Json<Snapshot> {
    Json(state.stats.snapshot())
}
