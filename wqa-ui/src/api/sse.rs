//! Server-Sent Events for view state changes

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

use crate::AppState;

/// GET /events
///
/// Streams:
/// - ConnectionStatus (once, on connect)
/// - ViewStateChanged (after every transition)
/// - AnalysisFailed (diagnostic)
/// - Resync (client fell behind; re-fetch the view)
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    wqa_common::sse::event_bus_sse_stream(&state.event_bus, "wqa-ui")
}
