//! wqa-ui library interface for testing
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod config;
pub mod error;
pub mod render;
pub mod services;
pub mod session;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use wqa_common::events::EventBus;

use crate::session::AnalysisController;

/// Build identity stamped by build.rs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub built_at: &'static str,
    pub profile: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("WQA_GIT_HASH"),
            built_at: env!("WQA_BUILD_TIMESTAMP"),
            profile: env!("WQA_BUILD_PROFILE"),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Owner of the view state machine
    pub controller: AnalysisController,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Largest accepted upload body
    pub max_upload_bytes: usize,
    pub build: BuildInfo,
}

impl AppState {
    pub fn new(controller: AnalysisController, event_bus: EventBus, max_upload_bytes: usize) -> Self {
        Self {
            controller,
            event_bus,
            startup_time: Utc::now(),
            max_upload_bytes,
            build: BuildInfo::current(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        // UI routes (HTML)
        .merge(api::ui_routes())
        // API routes
        .merge(api::analysis_routes())
        .route("/events", get(api::event_stream))
        .merge(api::health_routes())
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
