//! Async driver for the view state machine
//!
//! Owns the machine behind a lock, schedules the splash transition, runs the one
//! in-flight inference call on a spawned task with a bounded timeout, and
//! publishes a `ViewStateChanged` event after every transition.
//!
//! Failures from the analyzer never escape this type: they become the Error view.
//! That includes a panic inside the analyzer, which is caught at the task
//! boundary so the view cannot be left in Analyzing.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;
use wqa_common::events::{EventBus, ViewPhase, WqaEvent};

use super::sample::ImageSample;
use super::state::{AnalysisTicket, TransitionError, ViewState, ViewStateMachine};
use crate::services::{AnalysisFailure, WaterAnalyzer};

/// Shared handle to the view state machine
#[derive(Clone)]
pub struct AnalysisController {
    machine: Arc<RwLock<ViewStateMachine>>,
    analyzer: Arc<dyn WaterAnalyzer>,
    event_bus: EventBus,
    analysis_timeout: Duration,
    /// Cancels the splash timer and any in-flight analysis on teardown
    shutdown: CancellationToken,
    /// Diagnostic form of the most recent failure, for /health
    last_failure: Arc<RwLock<Option<String>>>,
}

impl AnalysisController {
    pub fn new(
        analyzer: Arc<dyn WaterAnalyzer>,
        event_bus: EventBus,
        analysis_timeout: Duration,
    ) -> Self {
        Self {
            machine: Arc::new(RwLock::new(ViewStateMachine::new())),
            analyzer,
            event_bus,
            analysis_timeout,
            shutdown: CancellationToken::new(),
            last_failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Copy of the current view state
    pub async fn snapshot(&self) -> ViewState {
        self.machine.read().await.state().clone()
    }

    pub async fn phase(&self) -> ViewPhase {
        self.machine.read().await.phase()
    }

    pub async fn cycle(&self) -> u64 {
        self.machine.read().await.cycle()
    }

    /// Resolve a live preview reference
    pub async fn preview(&self, id: Uuid) -> Option<ImageSample> {
        self.machine.read().await.preview(id).cloned()
    }

    pub async fn last_failure(&self) -> Option<String> {
        self.last_failure.read().await.clone()
    }

    pub fn analysis_timeout(&self) -> Duration {
        self.analysis_timeout
    }

    /// Schedule the Initializing -> Idle transition after `delay`
    ///
    /// The timer is tied to the controller's shutdown token, so tearing the
    /// service down never leaves a pending transition behind.
    pub fn schedule_splash(&self, delay: Duration) -> JoinHandle<()> {
        let controller = self.clone();
        let token = self.shutdown.child_token();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Splash timer cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    if let Err(e) = controller.finish_splash().await {
                        warn!("Splash transition refused: {}", e);
                    }
                }
            }
        })
    }

    /// Initializing -> Idle
    pub async fn finish_splash(&self) -> Result<(), TransitionError> {
        let cycle = {
            let mut machine = self.machine.write().await;
            machine.finish_splash()?;
            machine.cycle()
        };
        self.publish(ViewPhase::Initializing, ViewPhase::Idle, cycle);
        Ok(())
    }

    /// Idle -> Analyzing, then run the analysis in the background
    ///
    /// Refused unless the view is Idle, which is what keeps a single analysis in
    /// flight. The returned handle resolves once the cycle has settled into
    /// Result or Error; callers are free to drop it.
    pub async fn submit(&self, sample: ImageSample) -> Result<JoinHandle<()>, TransitionError> {
        let ticket = self.machine.write().await.begin_analysis(&sample)?;
        self.publish(ViewPhase::Idle, ViewPhase::Analyzing, ticket.cycle());

        let controller = self.clone();
        Ok(tokio::spawn(async move {
            controller.run_analysis(ticket, sample).await;
        }))
    }

    /// Result | Error -> Idle
    pub async fn reset(&self) -> Result<(), TransitionError> {
        let (old_phase, cycle) = {
            let mut machine = self.machine.write().await;
            let old_phase = machine.phase();
            machine.reset()?;
            (old_phase, machine.cycle())
        };
        self.publish(old_phase, ViewPhase::Idle, cycle);
        Ok(())
    }

    /// Cancel the splash timer and abandon any in-flight analysis
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    async fn run_analysis(&self, ticket: AnalysisTicket, sample: ImageSample) {
        let cycle = ticket.cycle();

        let outcome = tokio::select! {
            _ = self.shutdown.cancelled() => {
                info!(cycle, "Shutdown during analysis, abandoning cycle");
                return;
            }
            settled = tokio::time::timeout(
                self.analysis_timeout,
                AssertUnwindSafe(self.analyzer.analyze(&sample)).catch_unwind(),
            ) => match settled {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(panic)) => Err(AnalysisFailure::Internal(panic_message(panic.as_ref()))),
                Err(_) => Err(AnalysisFailure::TimedOut(self.analysis_timeout)),
            }
        };

        if let Err(failure) = &outcome {
            warn!(
                cycle,
                provider = self.analyzer.provider_id(),
                "Analysis failed: {}",
                failure
            );
            *self.last_failure.write().await = Some(failure.to_string());
            self.event_bus.emit_lossy(WqaEvent::AnalysisFailed {
                cycle,
                reason: failure.to_string(),
                timestamp: chrono::Utc::now(),
            });
        }

        let completed = self.machine.write().await.complete(ticket, outcome);
        match completed {
            Ok(new_phase) => self.publish(ViewPhase::Analyzing, new_phase, cycle),
            Err(e) => warn!(cycle, "Analysis outcome discarded: {}", e),
        }
    }

    fn publish(&self, old_phase: ViewPhase, new_phase: ViewPhase, cycle: u64) {
        debug!(
            cycle,
            "View state {} -> {}",
            old_phase.as_str(),
            new_phase.as_str()
        );
        self.event_bus.emit_lossy(WqaEvent::ViewStateChanged {
            old_phase,
            new_phase,
            cycle,
            timestamp: chrono::Utc::now(),
        });
    }
}

/// Text of a caught panic payload
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("analyzer panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("analyzer panicked: {}", msg)
    } else {
        "analyzer panicked".to_string()
    }
}
