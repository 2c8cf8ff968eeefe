//! Result schema for visual water analysis
//!
//! Four quality axes, each rated on its own small level vocabulary, plus a short
//! natural-language summary. The wire vocabulary (keys and level names) is the
//! pt-BR form the inference provider is instructed to answer in.
//!
//! The provider schema descriptor returned by [`response_schema`] is generated from
//! the same level enums the decoder uses, so the constraint sent out and the
//! contract validated on return stay in lockstep.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Visual severity tier of a level
///
/// Ordered from best to worst so that `Severity::Favorable < Severity::Severe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Favorable,
    Cautionary,
    Severe,
}

/// Level vocabulary of a single quality axis
pub trait AxisLevel: Copy + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Every permitted level, in severity order
    const PERMITTED: &'static [Self];

    /// Wire name of the level
    fn as_str(self) -> &'static str;

    /// Severity tier used by the presentation layer
    fn severity(self) -> Severity;

    /// Wire names of every permitted level
    fn permitted_labels() -> Vec<&'static str> {
        Self::PERMITTED.iter().map(|level| level.as_str()).collect()
    }
}

/// Low / Medium / High vocabulary (turbidity, algae, residue)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "Baixo")]
    Low,
    #[serde(rename = "Médio")]
    Medium,
    #[serde(rename = "Alto")]
    High,
}

impl AxisLevel for Level {
    const PERMITTED: &'static [Self] = &[Level::Low, Level::Medium, Level::High];

    fn as_str(self) -> &'static str {
        match self {
            Level::Low => "Baixo",
            Level::Medium => "Médio",
            Level::High => "Alto",
        }
    }

    fn severity(self) -> Severity {
        match self {
            Level::Low => Severity::Favorable,
            Level::Medium => Severity::Cautionary,
            Level::High => Severity::Severe,
        }
    }
}

/// Normal / Medium / High vocabulary (color axis; "Normal" means colorless)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColorLevel {
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "Médio")]
    Medium,
    #[serde(rename = "Alto")]
    High,
}

impl AxisLevel for ColorLevel {
    const PERMITTED: &'static [Self] = &[ColorLevel::Normal, ColorLevel::Medium, ColorLevel::High];

    fn as_str(self) -> &'static str {
        match self {
            ColorLevel::Normal => "Normal",
            ColorLevel::Medium => "Médio",
            ColorLevel::High => "Alto",
        }
    }

    fn severity(self) -> Severity {
        match self {
            ColorLevel::Normal => Severity::Favorable,
            ColorLevel::Medium => Severity::Cautionary,
            ColorLevel::High => Severity::Severe,
        }
    }
}

/// The four rated axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Turbidity,
    Algae,
    Color,
    Residue,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::Turbidity, Axis::Algae, Axis::Color, Axis::Residue];

    /// Key of the axis in the provider response
    pub fn key(self) -> &'static str {
        match self {
            Axis::Turbidity => "turbidez",
            Axis::Algae => "algas",
            Axis::Color => "cor",
            Axis::Residue => "residuos",
        }
    }

    /// Display title
    pub fn title(self) -> &'static str {
        match self {
            Axis::Turbidity => "Turbidez",
            Axis::Algae => "Algas",
            Axis::Color => "Cor",
            Axis::Residue => "Resíduos",
        }
    }
}

/// One rated axis: a level and what was observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisDetail<L> {
    #[serde(rename = "nivel")]
    level: L,
    #[serde(rename = "descricao")]
    description: String,
}

impl<L: AxisLevel> AnalysisDetail<L> {
    pub fn new(level: L, description: impl Into<String>) -> Self {
        Self {
            level,
            description: description.into(),
        }
    }

    pub fn level(&self) -> L {
        self.level
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Flattened view of one axis for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisReading<'a> {
    pub axis: Axis,
    pub level: &'static str,
    pub severity: Severity,
    pub description: &'a str,
}

/// Errors raised while decoding a provider response against the schema
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Body is not JSON at all (or is truncated)
    #[error("response is not valid JSON: {0}")]
    Syntax(String),

    /// Body is JSON but misses a required field or uses a disallowed level
    #[error("response does not match the analysis schema: {0}")]
    Violation(String),
}

/// Complete visual assessment of one water sample
///
/// All four axes and the summary are mandatory: decoding never yields a
/// partially populated result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "turbidez")]
    turbidity: AnalysisDetail<Level>,
    #[serde(rename = "algas")]
    algae: AnalysisDetail<Level>,
    #[serde(rename = "cor")]
    color: AnalysisDetail<ColorLevel>,
    #[serde(rename = "residuos")]
    residue: AnalysisDetail<Level>,
    #[serde(rename = "sumario")]
    summary: String,
}

impl AnalysisResult {
    pub fn new(
        turbidity: AnalysisDetail<Level>,
        algae: AnalysisDetail<Level>,
        color: AnalysisDetail<ColorLevel>,
        residue: AnalysisDetail<Level>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            turbidity,
            algae,
            color,
            residue,
            summary: summary.into(),
        }
    }

    /// Strict decode of a provider response body
    ///
    /// Blank summary or description text counts as a missing field.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let result: Self = serde_json::from_str(text).map_err(|e| match e.classify() {
            serde_json::error::Category::Data => SchemaError::Violation(e.to_string()),
            _ => SchemaError::Syntax(e.to_string()),
        })?;
        result.check_text()?;
        Ok(result)
    }

    fn check_text(&self) -> Result<(), SchemaError> {
        if self.summary.trim().is_empty() {
            return Err(SchemaError::Violation("sumario is blank".to_string()));
        }
        if let Some(reading) = self
            .readings()
            .iter()
            .find(|reading| reading.description.trim().is_empty())
        {
            return Err(SchemaError::Violation(format!(
                "{}.descricao is blank",
                reading.axis.key()
            )));
        }
        Ok(())
    }

    pub fn turbidity(&self) -> &AnalysisDetail<Level> {
        &self.turbidity
    }

    pub fn algae(&self) -> &AnalysisDetail<Level> {
        &self.algae
    }

    pub fn color(&self) -> &AnalysisDetail<ColorLevel> {
        &self.color
    }

    pub fn residue(&self) -> &AnalysisDetail<Level> {
        &self.residue
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// The four axes in display order
    pub fn readings(&self) -> [AxisReading<'_>; 4] {
        [
            reading(Axis::Turbidity, &self.turbidity),
            reading(Axis::Algae, &self.algae),
            reading(Axis::Color, &self.color),
            reading(Axis::Residue, &self.residue),
        ]
    }

    /// Worst severity across all axes
    pub fn overall_severity(&self) -> Severity {
        self.readings()
            .iter()
            .map(|r| r.severity)
            .max()
            .unwrap_or(Severity::Favorable)
    }
}

fn reading<L: AxisLevel>(axis: Axis, detail: &AnalysisDetail<L>) -> AxisReading<'_> {
    AxisReading {
        axis,
        level: detail.level.as_str(),
        severity: detail.level.severity(),
        description: &detail.description,
    }
}

fn detail_schema<L: AxisLevel>(axis_description: &str, level_description: &str, text_description: &str) -> Value {
    json!({
        "type": "OBJECT",
        "description": axis_description,
        "properties": {
            "nivel": {
                "type": "STRING",
                "enum": L::permitted_labels(),
                "description": level_description,
            },
            "descricao": {
                "type": "STRING",
                "description": text_description,
            },
        },
        "required": ["nivel", "descricao"],
    })
}

/// Structured-output schema descriptor sent to the inference provider
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "turbidez": detail_schema::<Level>(
                "Análise da turbidez da água (quão turva está).",
                "Nível de turbidez.",
                "Breve descrição do que foi observado.",
            ),
            "algas": detail_schema::<Level>(
                "Análise da presença de algas ou material vegetal similar.",
                "Nível de presença de algas.",
                "Breve descrição do que foi observado.",
            ),
            "cor": detail_schema::<ColorLevel>(
                "Análise da cor da água (amarelada, marrom, etc.). 'Normal' se for incolor.",
                "Nível de coloração anormal. 'Normal' para transparente.",
                "Breve descrição da cor observada.",
            ),
            "residuos": detail_schema::<Level>(
                "Análise da presença de resíduos sólidos visíveis (plástico, detritos, espuma, óleo).",
                "Nível de resíduos visíveis.",
                "Breve descrição dos resíduos observados.",
            ),
            "sumario": {
                "type": "STRING",
                "description": "Um resumo geral e conciso da análise visual em uma ou duas frases.",
            },
        },
        "required": ["turbidez", "algas", "cor", "residuos", "sumario"],
    })
}
