//! HTTP API handlers for wqa-ui
//!
//! HTML views, the upload/reset actions, previews, SSE and health.

pub mod analysis;
pub mod health;
pub mod sse;
pub mod ui;

pub use analysis::analysis_routes;
pub use health::health_routes;
pub use sse::event_stream;
pub use ui::ui_routes;
