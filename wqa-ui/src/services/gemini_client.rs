//! Gemini API client
//!
//! Sends one photo plus the structured-output schema to the `generateContent`
//! endpoint and decodes the JSON answer into an [`AnalysisResult`].
//!
//! One request per analysis. No retry, no rate limiting, no caching.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use wqa_common::analysis::response_schema;
use wqa_common::{AnalysisResult, Error};

use super::analyzer::{AnalysisFailure, WaterAnalyzer};
use crate::session::ImageSample;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const USER_AGENT: &str = concat!("WQA/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const API_KEY_HEADER: &str = "x-goog-api-key";

const ANALYSIS_PROMPT: &str = "\
Você é um especialista em análise visual de qualidade da água. Analise a imagem de uma amostra de água fornecida.
Com base APENAS em pistas visuais na imagem, forneça uma estimativa dos seguintes parâmetros. Não faça suposições além do que é visível.
Sua resposta deve estar estritamente em formato JSON, seguindo o schema fornecido.
A análise deve ser em Português (Brasil).
- Turbidez: Avalie se a água está clara ou turva.
- Algas: Procure por coloração verde ou material em suspensão que sugira algas.
- Cor: Observe qualquer cor anormal (amarelada, marrom). Se parecer incolor, considere 'Normal'.
- Resíduos: Identifique quaisquer partículas flutuantes, espuma, óleo ou lixo.";

/// `generateContent` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

/// `generateContent` response envelope (only the fields we read)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorEnvelope {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
    }

    fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
    }
}

/// Pull `error.message` out of a provider error body, falling back to the raw body
fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<ProviderErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, Error> {
        Self::with_endpoint(api_key, DEFAULT_BASE_URL, DEFAULT_MODEL)
    }

    /// Client against a specific API root and model
    pub fn with_endpoint(
        api_key: String,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full `generateContent` URL for the configured model
    pub fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Request body for one sample: instruction, inline image, output schema
    pub fn build_request(sample: &ImageSample) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text {
                        text: ANALYSIS_PROMPT.to_string(),
                    },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: sample.media_type().to_string(),
                            data: BASE64.encode(sample.bytes()),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        }
    }
}

#[async_trait]
impl WaterAnalyzer for GeminiClient {
    fn provider_id(&self) -> &'static str {
        "Gemini"
    }

    async fn analyze(&self, sample: &ImageSample) -> Result<AnalysisResult, AnalysisFailure> {
        let request = Self::build_request(sample);

        debug!(
            model = %self.model,
            media_type = sample.media_type(),
            bytes = sample.len(),
            "Querying Gemini API"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisFailure::Transport(e.to_string()))?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(AnalysisFailure::InvalidApiKey(status.as_u16()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisFailure::Provider {
                status: status.as_u16(),
                message: provider_error_message(&error_text),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AnalysisFailure::Transport(e.to_string()))?;

        if body.trim().is_empty() {
            return Err(AnalysisFailure::EmptyResponse);
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| AnalysisFailure::Malformed(e.to_string()))?;

        let text = envelope.text();
        if text.trim().is_empty() {
            warn!(
                block_reason = envelope.block_reason().unwrap_or("none"),
                finish_reason = envelope.finish_reason().unwrap_or("none"),
                "Gemini returned no text"
            );
            return Err(AnalysisFailure::EmptyResponse);
        }

        let result = AnalysisResult::from_json(&text)?;

        info!(
            overall = ?result.overall_severity(),
            "Gemini analysis decoded"
        );

        Ok(result)
    }
}
