//! ctat-ui - Conversation transcript annotation tool
//!
//! Serves a local web page for labeling customer-service conversations
//! against a fixed set of buckets and exporting an annotated workbook.
//! One reviewer, one session; nothing is persisted.

use anyhow::{Context, Result};
use clap::Parser;
use ctat_common::config::{default_config_path, load_toml_config, ServiceConfig, TomlConfig};
use ctat_common::Session;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ctat_ui::cli::Args;
use ctat_ui::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is resolved before tracing starts so log_level can feed the filter
    let config_path = args.config.clone().or_else(default_config_path);
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => TomlConfig::default(),
    };
    let config = ServiceConfig::resolve(&args.overrides(), &toml_config)
        .context("Invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    format!(
                        "ctat_ui={0},ctat_common={0},tower_http=info",
                        config.log_level
                    )
                    .into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting ctat-ui (Conversation Annotation) v{}",
        env!("CARGO_PKG_VERSION")
    );

    match &config_path {
        Some(path) if path.exists() => info!("Config file: {}", path.display()),
        Some(path) => warn!("Config file not found at {}, using defaults", path.display()),
        None => warn!("No config directory on this platform, using defaults"),
    }

    let state = match &args.open {
        Some(path) => {
            let session = preload(path).await?;
            AppState::with_session(&config, session)
        }
        None => AppState::new(&config),
    };

    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;
    info!("ctat-ui listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Load a workbook from disk into a new session
async fn preload(path: &std::path::Path) -> Result<Session> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let session = Session::from_workbook(&file_name, &bytes)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    info!(
        "Preloaded {} conversations from {}",
        session.conversations().len(),
        path.display()
    );
    Ok(session)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
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
