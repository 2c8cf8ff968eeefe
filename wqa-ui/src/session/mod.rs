//! View session: the sample, its preview, the state machine and its driver

pub mod controller;
pub mod preview;
pub mod sample;
pub mod state;

pub use controller::AnalysisController;
pub use preview::{PreviewRef, PreviewRegistry};
pub use sample::ImageSample;
pub use state::{AnalysisTicket, TransitionError, ViewState, ViewStateMachine};
