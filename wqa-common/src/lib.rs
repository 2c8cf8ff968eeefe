//! # WQA Common Library
//!
//! Shared code for the water quality analyzer:
//! - Result schema (quality axes, levels, provider schema descriptor)
//! - Event types (WqaEvent enum) and the broadcast EventBus
//! - SSE streaming helper
//! - Common error type

pub mod analysis;
pub mod error;
pub mod events;
pub mod sse;

pub use analysis::{
    AnalysisDetail, AnalysisResult, Axis, AxisLevel, AxisReading, ColorLevel, Level, SchemaError,
    Severity,
};
pub use error::{Error, Result};
