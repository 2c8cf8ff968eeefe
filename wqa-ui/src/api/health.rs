//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use wqa_common::events::ViewPhase;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok")
    pub status: String,
    /// Module name ("wqa-ui")
    pub module: String,
    pub version: String,
    pub git_hash: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Current view phase
    pub phase: ViewPhase,
    /// Number of analysis cycles started
    pub cycles: u64,
    /// Upper bound on one analysis call
    pub analysis_timeout_secs: u64,
    /// Diagnostic form of the most recent analysis failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "wqa-ui".to_string(),
        version: state.build.version.to_string(),
        git_hash: state.build.git_hash.to_string(),
        uptime_seconds,
        phase: state.controller.phase().await,
        cycles: state.controller.cycle().await,
        analysis_timeout_secs: state.controller.analysis_timeout().as_secs(),
        last_error: state.controller.last_failure().await,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
