//! UI routes - server-rendered HTML
//!
//! `/` serves the full page; `/view` serves only the fragment for the current
//! view state, which the page swaps in whenever an SSE `ViewStateChanged`
//! arrives.

use axum::{extract::State, response::Html, routing::get, Router};

use crate::render;
use crate::AppState;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_page))
        .route("/view", get(view_fragment))
}

/// GET /
async fn root_page(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.controller.snapshot().await;
    Html(render::page(&snapshot, &state.build))
}

/// GET /view
async fn view_fragment(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.controller.snapshot().await;
    Html(render::view(&snapshot))
}
