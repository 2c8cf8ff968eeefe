//! Event types for the WQA event system
//!
//! Provides the shared event definitions and the EventBus used to push view
//! state changes to connected browsers.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Coarse phase of the view state machine
///
/// Mirrors the variants of the view state without their payloads, so events stay
/// small and serializable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    Initializing,
    Idle,
    Analyzing,
    Result,
    Error,
}

impl ViewPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewPhase::Initializing => "initializing",
            ViewPhase::Idle => "idle",
            ViewPhase::Analyzing => "analyzing",
            ViewPhase::Result => "result",
            ViewPhase::Error => "error",
        }
    }
}

/// WQA event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WqaEvent {
    /// The view state machine completed a transition
    ///
    /// Triggers:
    /// - SSE: connected pages re-fetch the current view
    ViewStateChanged {
        /// Phase before the transition
        old_phase: ViewPhase,
        /// Phase after the transition
        new_phase: ViewPhase,
        /// Analysis cycle the new state belongs to (0 before the first upload)
        cycle: u64,
        /// When the transition happened
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An analysis cycle ended in failure
    ///
    /// Carries the diagnostic reason, not the user-facing message.
    AnalysisFailed {
        cycle: u64,
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl WqaEvent {
    /// Event name used as the SSE `event:` field
    pub fn event_type(&self) -> &str {
        match self {
            WqaEvent::ViewStateChanged { .. } => "ViewStateChanged",
            WqaEvent::AnalysisFailed { .. } => "AnalysisFailed",
        }
    }
}

/// Broadcast bus for WQA events
///
/// Cloning is cheap; every clone shares the same channel.
///
/// # Examples
///
/// ```
/// use wqa_common::events::{EventBus, ViewPhase, WqaEvent};
///
/// let event_bus = EventBus::new(16);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(WqaEvent::ViewStateChanged {
///     old_phase: ViewPhase::Initializing,
///     new_phase: ViewPhase::Idle,
///     cycle: 0,
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert_eq!(rx.try_recv().unwrap().event_type(), "ViewStateChanged");
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<WqaEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// * `capacity` - Number of events to buffer before lagging receivers drop old events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<WqaEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: WqaEvent,
    ) -> Result<usize, broadcast::error::SendError<WqaEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// State changes are published this way: with no page open there is nobody
    /// to notify, and the state itself is the source of truth.
    pub fn emit_lossy(&self, event: WqaEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
