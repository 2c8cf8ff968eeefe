//! External services used by wqa-ui

pub mod analyzer;
pub mod gemini_client;

pub use analyzer::{AnalysisFailure, WaterAnalyzer};
pub use gemini_client::GeminiClient;
