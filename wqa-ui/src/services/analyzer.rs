//! Analyzer seam between the view state machine and the inference provider

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use wqa_common::{AnalysisResult, SchemaError};

use crate::session::ImageSample;

const UNAVAILABLE_MESSAGE: &str =
    "Não foi possível processar a imagem. A API pode estar indisponível ou a imagem pode ser inválida.";

/// Why an analysis produced no result
///
/// `Display` is the diagnostic form for logs; [`AnalysisFailure::user_message`]
/// is what the error view shows.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisFailure {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Provider rejected the API key (HTTP {0})")]
    InvalidApiKey(u16),

    #[error("API error {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Provider returned an empty response")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("No response within {0:?}")]
    TimedOut(Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalysisFailure {
    /// Human-readable cause, suitable for the error view
    pub fn user_message(&self) -> String {
        match self {
            AnalysisFailure::Transport(_)
            | AnalysisFailure::InvalidApiKey(_)
            | AnalysisFailure::Provider { .. } => UNAVAILABLE_MESSAGE.to_string(),
            AnalysisFailure::EmptyResponse => "A API retornou uma resposta vazia.".to_string(),
            AnalysisFailure::Malformed(_) | AnalysisFailure::SchemaViolation(_) => {
                "A resposta da API não pôde ser interpretada. Tente novamente com outra imagem."
                    .to_string()
            }
            AnalysisFailure::TimedOut(limit) => format!(
                "A análise excedeu o tempo limite de {} segundos. A API pode estar indisponível.",
                limit.as_secs()
            ),
            AnalysisFailure::Internal(_) => {
                "Ocorreu um erro inesperado ao processar a imagem. Tente novamente.".to_string()
            }
        }
    }
}

impl From<SchemaError> for AnalysisFailure {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Syntax(msg) => AnalysisFailure::Malformed(msg),
            SchemaError::Violation(msg) => AnalysisFailure::SchemaViolation(msg),
        }
    }
}

/// Something that can turn a photo into a structured assessment
///
/// One call is one remote round-trip; implementations never retry.
#[async_trait]
pub trait WaterAnalyzer: Send + Sync {
    /// Provider identifier for logs (e.g., "Gemini")
    fn provider_id(&self) -> &'static str;

    /// Assess one sample
    ///
    /// # Returns
    /// * `Ok(AnalysisResult)` - every axis and the summary present and valid
    /// * `Err(AnalysisFailure)` - no result; never a partial one
    async fn analyze(&self, sample: &ImageSample) -> Result<AnalysisResult, AnalysisFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failures_mention_unavailability() {
        for failure in [
            AnalysisFailure::Transport("connection refused".to_string()),
            AnalysisFailure::InvalidApiKey(403),
            AnalysisFailure::Provider {
                status: 503,
                message: "overloaded".to_string(),
            },
        ] {
            assert!(failure.user_message().contains("indisponível"), "{failure}");
        }
    }

    #[test]
    fn test_empty_response_message() {
        assert!(AnalysisFailure::EmptyResponse.user_message().contains("resposta vazia"));
    }

    #[test]
    fn test_timeout_message_carries_limit() {
        let message = AnalysisFailure::TimedOut(Duration::from_secs(60)).user_message();
        assert!(message.contains("60 segundos"));
    }

    #[test]
    fn test_internal_failure_hides_diagnostics() {
        let failure = AnalysisFailure::Internal("analyzer panicked: index out of bounds".to_string());
        assert!(failure.user_message().contains("erro inesperado"));
        assert!(!failure.user_message().contains("index out of bounds"));
    }

    #[test]
    fn test_schema_errors_map_to_failures() {
        assert_eq!(
            AnalysisFailure::from(SchemaError::Syntax("eof".to_string())),
            AnalysisFailure::Malformed("eof".to_string())
        );
        assert_eq!(
            AnalysisFailure::from(SchemaError::Violation("missing field".to_string())),
            AnalysisFailure::SchemaViolation("missing field".to_string())
        );
    }

    #[test]
    fn test_diagnostic_form_differs_from_user_message() {
        let failure = AnalysisFailure::Provider {
            status: 500,
            message: "internal".to_string(),
        };
        assert_eq!(failure.to_string(), "API error 500: internal");
        assert_ne!(failure.to_string(), failure.user_message());
    }
}
