//! wqa-ui - Water sample visual analyzer
//!
//! Serves the single-page UI, owns the view state machine and forwards each
//! submitted photo to the inference provider.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wqa_common::events::EventBus;

use wqa_ui::config::{
    resolve_api_key, ServiceConfig, DEFAULT_ANALYSIS_TIMEOUT_SECS, DEFAULT_MAX_UPLOAD_MB,
    DEFAULT_PORT, DEFAULT_SPLASH_MS,
};
use wqa_ui::services::gemini_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use wqa_ui::services::GeminiClient;
use wqa_ui::session::AnalysisController;
use wqa_ui::AppState;

/// Command-line arguments for wqa-ui
#[derive(Parser, Debug)]
#[command(name = "wqa-ui")]
#[command(about = "Visual water quality analyzer")]
#[command(version)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1", env = "WQA_BIND")]
    bind: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "WQA_PORT")]
    port: u16,

    /// Inference model name
    #[arg(long, default_value = DEFAULT_MODEL, env = "WQA_GEMINI_MODEL")]
    model: String,

    /// Inference API root URL
    #[arg(long, default_value = DEFAULT_BASE_URL, env = "WQA_GEMINI_BASE_URL")]
    api_base_url: String,

    /// Splash screen duration in milliseconds
    #[arg(long, default_value_t = DEFAULT_SPLASH_MS, env = "WQA_SPLASH_MS")]
    splash_ms: u64,

    /// Upper bound on one analysis call, in seconds
    #[arg(long, default_value_t = DEFAULT_ANALYSIS_TIMEOUT_SECS, env = "WQA_ANALYSIS_TIMEOUT_SECS")]
    analysis_timeout_secs: u64,

    /// Largest accepted upload, in MiB
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_MB, env = "WQA_MAX_UPLOAD_MB")]
    max_upload_mb: usize,
}

impl From<Args> for ServiceConfig {
    fn from(args: Args) -> Self {
        Self {
            bind: args.bind,
            port: args.port,
            model: args.model,
            api_base_url: args.api_base_url,
            splash_delay: Duration::from_millis(args.splash_ms),
            analysis_timeout: Duration::from_secs(args.analysis_timeout_secs),
            max_upload_bytes: args.max_upload_mb.saturating_mul(1024 * 1024),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wqa_ui=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from(Args::parse());
    config.validate().context("Invalid configuration")?;

    info!("Starting wqa-ui (Water Visual Analyzer)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Missing credential is fatal: the UI never comes up without it
    let api_key = resolve_api_key().context("Startup aborted")?;

    let client = GeminiClient::with_endpoint(api_key, config.api_base_url.clone(), config.model.clone())
        .context("Failed to initialize inference client")?;
    info!("Inference client ready (model {})", client.model());

    let event_bus = EventBus::new(64);
    let controller = AnalysisController::new(Arc::new(client), event_bus.clone(), config.analysis_timeout);
    controller.schedule_splash(config.splash_delay);

    let state = AppState::new(controller.clone(), event_bus, config.max_upload_bytes);
    let app = wqa_ui::build_router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);

    let teardown = controller.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            teardown.shutdown();
        })
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
