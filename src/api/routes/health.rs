//! Health Routes
//!
//! Health check endpoints for monitoring.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// Full health status. The service is degraded when the template index
/// cannot be read, since the dashboard cannot build its router then.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let dictionary_ok = state.dictionary.index_path.is_file();

    Json(HealthResponse {
        status: if dictionary_ok { "healthy" } else { "degraded" }.to_string(),
        dictionary: if dictionary_ok { "ok" } else { "missing" }.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
