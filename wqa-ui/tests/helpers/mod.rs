//! Shared test helpers: fake analyzers, samples, canned results
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use wqa_common::events::EventBus;
use wqa_common::{AnalysisDetail, AnalysisResult, ColorLevel, Level};
use wqa_ui::services::{AnalysisFailure, WaterAnalyzer};
use wqa_ui::session::{AnalysisController, ImageSample};

pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];

pub const CLEAR_WATER_JSON: &str = r#"{
    "turbidez": {"nivel": "Baixo", "descricao": "Água transparente, sem partículas em suspensão."},
    "algas": {"nivel": "Baixo", "descricao": "Nenhum sinal de coloração verde."},
    "cor": {"nivel": "Normal", "descricao": "A água parece incolor."},
    "residuos": {"nivel": "Baixo", "descricao": "Nenhum resíduo visível."},
    "sumario": "A amostra aparenta estar limpa e transparente."
}"#;

pub fn png_sample() -> ImageSample {
    ImageSample::from_upload(PNG_BYTES.to_vec(), Some("image/png")).expect("png sample")
}

pub fn clear_water_result() -> AnalysisResult {
    AnalysisResult::new(
        AnalysisDetail::new(Level::Low, "Água transparente."),
        AnalysisDetail::new(Level::Low, "Sem algas."),
        AnalysisDetail::new(ColorLevel::Normal, "Incolor."),
        AnalysisDetail::new(Level::Low, "Sem resíduos."),
        "A amostra aparenta estar limpa e transparente.",
    )
}

pub fn murky_result() -> AnalysisResult {
    AnalysisResult::new(
        AnalysisDetail::new(Level::High, "Muito turva."),
        AnalysisDetail::new(Level::Medium, "Tons esverdeados."),
        AnalysisDetail::new(ColorLevel::High, "Marrom escuro."),
        AnalysisDetail::new(Level::Medium, "Espuma na superfície."),
        "A amostra apresenta sinais visuais de contaminação.",
    )
}

/// Analyzer that replays scripted outcomes, optionally holding each call until
/// the test releases a permit on the gate
pub struct ScriptedAnalyzer {
    outcomes: Mutex<VecDeque<Result<AnalysisResult, AnalysisFailure>>>,
    gate: Option<Arc<Semaphore>>,
    calls: AtomicUsize,
}

impl ScriptedAnalyzer {
    pub fn new(outcomes: Vec<Result<AnalysisResult, AnalysisFailure>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn gated(outcomes: Vec<Result<AnalysisResult, AnalysisFailure>>, gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(outcomes)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WaterAnalyzer for ScriptedAnalyzer {
    fn provider_id(&self) -> &'static str {
        "Scripted"
    }

    async fn analyze(&self, _sample: &ImageSample) -> Result<AnalysisResult, AnalysisFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AnalysisFailure::EmptyResponse))
    }
}

/// Analyzer whose call never settles
pub struct HangingAnalyzer;

#[async_trait]
impl WaterAnalyzer for HangingAnalyzer {
    fn provider_id(&self) -> &'static str {
        "Hanging"
    }

    async fn analyze(&self, _sample: &ImageSample) -> Result<AnalysisResult, AnalysisFailure> {
        std::future::pending().await
    }
}

/// Analyzer that panics mid-call
pub struct PanickingAnalyzer;

#[async_trait]
impl WaterAnalyzer for PanickingAnalyzer {
    fn provider_id(&self) -> &'static str {
        "Panicking"
    }

    async fn analyze(&self, _sample: &ImageSample) -> Result<AnalysisResult, AnalysisFailure> {
        panic!("decoder blew up")
    }
}

pub fn controller_with(analyzer: Arc<dyn WaterAnalyzer>, timeout: Duration) -> (AnalysisController, EventBus) {
    let event_bus = EventBus::new(32);
    let controller = AnalysisController::new(analyzer, event_bus.clone(), timeout);
    (controller, event_bus)
}

/// Controller already past the splash screen
pub async fn idle_controller(analyzer: Arc<dyn WaterAnalyzer>) -> (AnalysisController, EventBus) {
    let (controller, event_bus) = controller_with(analyzer, Duration::from_secs(30));
    controller.finish_splash().await.expect("splash");
    (controller, event_bus)
}
