//! Analysis workflow endpoints
//!
//! - POST /analyze: submit one image (raw body + Content-Type)
//! - POST /reset: leave Result/Error for Idle
//! - GET /state: current view state as JSON
//! - GET /preview/:id: bytes of the held preview

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::session::{ImageSample, ViewState};
use crate::AppState;

/// Build analysis routes
pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(submit_sample))
        .route("/reset", post(reset_view))
        .route("/state", get(current_state))
        .route("/preview/:id", get(preview_image))
}

/// POST /analyze
///
/// **Returns:**
/// - 202 Accepted + view state: analysis started
/// - 204 No Content: not an image, ignored (no transition)
/// - 409 Conflict: view is not Idle
async fn submit_sample(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let declared_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let Some(sample) = ImageSample::from_upload(body, declared_type) else {
        debug!(content_type = ?declared_type, "Ignoring non-image upload");
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    // The analysis runs detached; its outcome arrives as a state change
    let _analysis = state.controller.submit(sample).await?;

    let snapshot = state.controller.snapshot().await;
    Ok((StatusCode::ACCEPTED, Json(snapshot)).into_response())
}

/// POST /reset
async fn reset_view(State(state): State<AppState>) -> ApiResult<Json<ViewState>> {
    state.controller.reset().await?;
    Ok(Json(state.controller.snapshot().await))
}

/// GET /state
async fn current_state(State(state): State<AppState>) -> Json<ViewState> {
    Json(state.controller.snapshot().await)
}

/// GET /preview/:id
async fn preview_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let sample = state
        .controller
        .preview(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Preview {}", id)))?;

    let content_type = HeaderValue::from_str(sample.media_type())
        .map_err(|e| ApiError::Internal(format!("Invalid preview media type: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
            (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        ],
        sample.bytes().clone(),
    )
        .into_response())
}
