//! View state machine
//!
//! ```text
//! Initializing --splash--> Idle --sample--> Analyzing --ok--> Result --reset--> Idle
//!                                                     \--err--> Error  --reset--> Idle
//! ```
//!
//! The machine is synchronous and owns the preview registry plus the one held
//! preview reference. Every transition is guarded: firing it from the wrong
//! state is a [`TransitionError`] and leaves the machine untouched. The async
//! side (spawning the inference call, timeouts, event publishing) lives in
//! [`super::controller::AnalysisController`].

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;
use wqa_common::events::ViewPhase;
use wqa_common::AnalysisResult;

use super::preview::{PreviewRef, PreviewRegistry};
use super::sample::ImageSample;
use crate::services::AnalysisFailure;

/// What the page is currently showing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    Initializing,
    Idle,
    Analyzing {
        preview: PreviewRef,
    },
    Result {
        result: AnalysisResult,
        preview: PreviewRef,
    },
    Error {
        message: String,
    },
}

impl ViewState {
    pub fn phase(&self) -> ViewPhase {
        match self {
            ViewState::Initializing => ViewPhase::Initializing,
            ViewState::Idle => ViewPhase::Idle,
            ViewState::Analyzing { .. } => ViewPhase::Analyzing,
            ViewState::Result { .. } => ViewPhase::Result,
            ViewState::Error { .. } => ViewPhase::Error,
        }
    }
}

/// Refused transition
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {action} while {}", .phase.as_str())]
    InvalidState {
        action: &'static str,
        phase: ViewPhase,
    },

    #[error("analysis cycle {ticket} is no longer current (current cycle {current})")]
    StaleCycle { ticket: u64, current: u64 },
}

/// Proof that an analysis cycle was started; consumed by its completion
#[derive(Debug)]
pub struct AnalysisTicket {
    cycle: u64,
}

impl AnalysisTicket {
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}

/// Message shown by the error view for a failed cycle
pub fn failure_message(failure: &AnalysisFailure) -> String {
    format!("Falha na análise. {}", failure.user_message())
}

/// Single source of truth for the view
#[derive(Debug)]
pub struct ViewStateMachine {
    state: ViewState,
    previews: PreviewRegistry,
    held_preview: Option<PreviewRef>,
    cycle: u64,
}

impl Default for ViewStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewStateMachine {
    pub fn new() -> Self {
        Self {
            state: ViewState::Initializing,
            previews: PreviewRegistry::new(),
            held_preview: None,
            cycle: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn phase(&self) -> ViewPhase {
        self.state.phase()
    }

    /// Number of the current (or last) analysis cycle; 0 before the first
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn held_preview(&self) -> Option<&PreviewRef> {
        self.held_preview.as_ref()
    }

    /// Resolve a live preview reference
    pub fn preview(&self, id: Uuid) -> Option<&ImageSample> {
        self.previews.get(id)
    }

    /// Initializing -> Idle
    pub fn finish_splash(&mut self) -> Result<(), TransitionError> {
        self.expect_phase("finish the splash screen", &[ViewPhase::Initializing])?;
        self.state = ViewState::Idle;
        info!("View ready");
        Ok(())
    }

    /// Idle -> Analyzing
    ///
    /// Opens a new cycle, registers a preview for the sample and hands back the
    /// ticket the completion must present.
    pub fn begin_analysis(&mut self, sample: &ImageSample) -> Result<AnalysisTicket, TransitionError> {
        self.expect_phase("start an analysis", &[ViewPhase::Idle])?;

        self.release_preview();
        self.cycle += 1;
        let preview = self.previews.create(sample);
        self.held_preview = Some(preview.clone());
        self.state = ViewState::Analyzing { preview };

        info!(
            cycle = self.cycle,
            media_type = sample.media_type(),
            bytes = sample.len(),
            "Analysis started"
        );
        Ok(AnalysisTicket { cycle: self.cycle })
    }

    /// Analyzing -> Result | Error
    pub fn complete(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<AnalysisResult, AnalysisFailure>,
    ) -> Result<ViewPhase, TransitionError> {
        let preview = match &self.state {
            ViewState::Analyzing { preview } => preview.clone(),
            other => {
                return Err(TransitionError::InvalidState {
                    action: "complete an analysis",
                    phase: other.phase(),
                })
            }
        };
        if ticket.cycle != self.cycle {
            return Err(TransitionError::StaleCycle {
                ticket: ticket.cycle,
                current: self.cycle,
            });
        }

        self.state = match outcome {
            Ok(result) => {
                info!(cycle = self.cycle, "Analysis succeeded");
                ViewState::Result { result, preview }
            }
            Err(failure) => {
                info!(cycle = self.cycle, reason = %failure, "Analysis failed");
                ViewState::Error {
                    message: failure_message(&failure),
                }
            }
        };
        Ok(self.phase())
    }

    /// Result | Error -> Idle, releasing the held preview
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        self.expect_phase("reset", &[ViewPhase::Result, ViewPhase::Error])?;
        self.release_preview();
        self.state = ViewState::Idle;
        info!(cycle = self.cycle, "View reset");
        Ok(())
    }

    fn expect_phase(&self, action: &'static str, allowed: &[ViewPhase]) -> Result<(), TransitionError> {
        let phase = self.phase();
        if allowed.contains(&phase) {
            Ok(())
        } else {
            Err(TransitionError::InvalidState { action, phase })
        }
    }

    fn release_preview(&mut self) {
        if let Some(preview) = self.held_preview.take() {
            self.previews.revoke(&preview);
            debug!(preview = %preview.id(), "Preview released");
        }
    }
}
