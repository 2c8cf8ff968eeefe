//! Integration tests for the analysis controller
//!
//! Drive full view cycles against scripted analyzers: splash, submission,
//! success, failure, timeout, reset and the single-in-flight guard.

mod helpers;

use helpers::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use wqa_common::events::{ViewPhase, WqaEvent};
use wqa_ui::render;
use wqa_ui::services::AnalysisFailure;
use wqa_ui::session::{TransitionError, ViewState};

#[tokio::test]
async fn test_clear_water_sample_reaches_result() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(vec![Ok(clear_water_result())]));
    let (controller, _bus) = idle_controller(analyzer.clone()).await;

    let handle = controller.submit(png_sample()).await.unwrap();
    handle.await.unwrap();

    let state = controller.snapshot().await;
    let ViewState::Result { result, preview } = &state else {
        panic!("expected result view, got {:?}", state);
    };
    assert_eq!(result, &clear_water_result());
    assert!(controller.preview(preview.id()).await.is_some());
    assert_eq!(analyzer.calls(), 1);

    let html = render::view(&state);
    assert_eq!(html.matches("card card-favorable").count(), 4);
    assert!(html.contains("A amostra aparenta estar limpa e transparente."));
}

#[tokio::test]
async fn test_empty_response_shows_error_view() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(vec![Err(AnalysisFailure::EmptyResponse)]));
    let (controller, _bus) = idle_controller(analyzer).await;

    controller.submit(png_sample()).await.unwrap().await.unwrap();

    match controller.snapshot().await {
        ViewState::Error { message } => {
            assert!(message.starts_with("Falha na análise."));
            assert!(message.contains("resposta vazia"));
        }
        other => panic!("expected error view, got {:?}", other),
    }
    assert_eq!(
        controller.last_failure().await.as_deref(),
        Some("Provider returned an empty response")
    );
}

#[tokio::test]
async fn test_transport_failure_shows_unavailable_message() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(vec![Err(AnalysisFailure::Transport(
        "connection refused".to_string(),
    ))]));
    let (controller, _bus) = idle_controller(analyzer).await;

    controller.submit(png_sample()).await.unwrap().await.unwrap();

    match controller.snapshot().await {
        ViewState::Error { message } => assert!(message.contains("indisponível")),
        other => panic!("expected error view, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reset_releases_preview_and_next_cycle_is_fresh() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(vec![
        Ok(murky_result()),
        Ok(clear_water_result()),
    ]));
    let (controller, _bus) = idle_controller(analyzer).await;

    controller.submit(png_sample()).await.unwrap().await.unwrap();
    let first_preview = match controller.snapshot().await {
        ViewState::Result { preview, .. } => preview,
        other => panic!("expected result view, got {:?}", other),
    };

    controller.reset().await.unwrap();
    assert_eq!(controller.snapshot().await, ViewState::Idle);
    assert!(controller.preview(first_preview.id()).await.is_none());

    controller.submit(png_sample()).await.unwrap().await.unwrap();
    match controller.snapshot().await {
        ViewState::Result { result, preview } => {
            assert_eq!(result, clear_water_result());
            assert_ne!(preview, first_preview);
        }
        other => panic!("expected result view, got {:?}", other),
    }
    assert_eq!(controller.cycle().await, 2);
}

#[tokio::test]
async fn test_resubmitting_same_image_after_error_starts_new_cycle() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(vec![
        Err(AnalysisFailure::Malformed("expected value".to_string())),
        Ok(clear_water_result()),
    ]));
    let (controller, _bus) = idle_controller(analyzer.clone()).await;
    let sample = png_sample();

    controller.submit(sample.clone()).await.unwrap().await.unwrap();
    assert_eq!(controller.phase().await, ViewPhase::Error);

    controller.reset().await.unwrap();
    controller.submit(sample).await.unwrap().await.unwrap();

    assert_eq!(controller.phase().await, ViewPhase::Result);
    assert_eq!(analyzer.calls(), 2);
}

#[tokio::test]
async fn test_second_submission_refused_while_analyzing() {
    let gate = Arc::new(Semaphore::new(0));
    let analyzer = Arc::new(ScriptedAnalyzer::gated(
        vec![Ok(clear_water_result())],
        gate.clone(),
    ));
    let (controller, _bus) = idle_controller(analyzer.clone()).await;

    let handle = controller.submit(png_sample()).await.unwrap();
    assert_eq!(controller.phase().await, ViewPhase::Analyzing);

    let refused = controller.submit(png_sample()).await.unwrap_err();
    assert_eq!(
        refused,
        TransitionError::InvalidState {
            action: "start an analysis",
            phase: ViewPhase::Analyzing,
        }
    );

    gate.add_permits(1);
    handle.await.unwrap();

    assert_eq!(controller.phase().await, ViewPhase::Result);
    assert_eq!(analyzer.calls(), 1);
}

#[tokio::test]
async fn test_reset_refused_while_analyzing() {
    let gate = Arc::new(Semaphore::new(0));
    let analyzer = Arc::new(ScriptedAnalyzer::gated(
        vec![Ok(clear_water_result())],
        gate.clone(),
    ));
    let (controller, _bus) = idle_controller(analyzer).await;

    let handle = controller.submit(png_sample()).await.unwrap();
    assert!(controller.reset().await.is_err());
    assert_eq!(controller.phase().await, ViewPhase::Analyzing);

    gate.add_permits(1);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_submission_refused_during_splash() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(vec![Ok(clear_water_result())]));
    let (controller, _bus) = controller_with(analyzer.clone(), Duration::from_secs(30));

    assert!(controller.submit(png_sample()).await.is_err());
    assert_eq!(controller.phase().await, ViewPhase::Initializing);
    assert_eq!(controller.cycle().await, 0);
    assert_eq!(analyzer.calls(), 0);
}

#[tokio::test]
async fn test_panicking_analyzer_ends_in_error_view() {
    let (controller, _bus) = idle_controller(Arc::new(PanickingAnalyzer)).await;

    controller.submit(png_sample()).await.unwrap().await.unwrap();

    match controller.snapshot().await {
        ViewState::Error { message } => assert!(message.contains("erro inesperado")),
        other => panic!("expected error view, got {:?}", other),
    }
    assert_eq!(
        controller.last_failure().await.as_deref(),
        Some("Internal error: analyzer panicked: decoder blew up")
    );

    // The view recovers without a restart
    controller.reset().await.unwrap();
    assert_eq!(controller.phase().await, ViewPhase::Idle);
    assert!(controller.submit(png_sample()).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_unresponsive_provider_times_out_into_error() {
    let (controller, _bus) = controller_with(Arc::new(HangingAnalyzer), Duration::from_secs(5));
    controller.finish_splash().await.unwrap();

    let handle = controller.submit(png_sample()).await.unwrap();
    handle.await.unwrap();

    match controller.snapshot().await {
        ViewState::Error { message } => assert!(message.contains("5 segundos")),
        other => panic!("expected error view, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_splash_transitions_after_delay() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(vec![]));
    let (controller, _bus) = controller_with(analyzer, Duration::from_secs(30));

    let handle = controller.schedule_splash(Duration::from_millis(3_000));

    tokio::time::sleep(Duration::from_millis(2_999)).await;
    assert_eq!(controller.phase().await, ViewPhase::Initializing);

    handle.await.unwrap();
    assert_eq!(controller.phase().await, ViewPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_pending_splash() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(vec![]));
    let (controller, _bus) = controller_with(analyzer, Duration::from_secs(30));

    let handle = controller.schedule_splash(Duration::from_millis(3_000));
    controller.shutdown();
    handle.await.unwrap();

    assert_eq!(controller.phase().await, ViewPhase::Initializing);
}

#[tokio::test]
async fn test_shutdown_abandons_in_flight_analysis() {
    let gate = Arc::new(Semaphore::new(0));
    let analyzer = Arc::new(ScriptedAnalyzer::gated(vec![], gate));
    let (controller, _bus) = idle_controller(analyzer).await;

    let handle = controller.submit(png_sample()).await.unwrap();
    controller.shutdown();
    handle.await.unwrap();

    assert_eq!(controller.phase().await, ViewPhase::Analyzing);
    assert!(controller.last_failure().await.is_none());
}

#[tokio::test]
async fn test_transitions_are_published_in_order() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(vec![Err(AnalysisFailure::EmptyResponse)]));
    let (controller, bus) = controller_with(analyzer, Duration::from_secs(30));
    let mut rx = bus.subscribe();

    controller.finish_splash().await.unwrap();
    controller.submit(png_sample()).await.unwrap().await.unwrap();
    controller.reset().await.unwrap();

    let mut transitions = Vec::new();
    let mut failures = 0;
    while let Ok(event) = rx.try_recv() {
        match event {
            WqaEvent::ViewStateChanged {
                old_phase,
                new_phase,
                ..
            } => transitions.push((old_phase, new_phase)),
            WqaEvent::AnalysisFailed { cycle, .. } => {
                assert_eq!(cycle, 1);
                failures += 1;
            }
        }
    }

    assert_eq!(
        transitions,
        vec![
            (ViewPhase::Initializing, ViewPhase::Idle),
            (ViewPhase::Idle, ViewPhase::Analyzing),
            (ViewPhase::Analyzing, ViewPhase::Error),
            (ViewPhase::Error, ViewPhase::Idle),
        ]
    );
    assert_eq!(failures, 1);
}
