//! weaver-server - Stem Weaver HTTP service
//!
//! Lists the stems of uploaded ZIP archives, matches and scores the stems two
//! archives share, and assembles a mixed archive from the user's picks.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weaver_common::config::{self, ServerConfig, ServerOverrides};
use weaver_server::{build_router, AppState};

/// Command-line arguments for weaver-server
#[derive(Parser, Debug)]
#[command(name = "weaver-server")]
#[command(about = "Stem Weaver HTTP service")]
#[command(version)]
struct Args {
    /// Address to listen on, e.g. 127.0.0.1:5790
    #[arg(short, long, env = "WEAVER_BIND")]
    bind: Option<String>,

    /// Largest accepted request body in bytes
    #[arg(long, env = "WEAVER_MAX_UPLOAD_BYTES")]
    max_upload_bytes: Option<usize>,

    /// Artificial analysis delay in milliseconds
    #[arg(long, env = "WEAVER_ANALYSIS_DELAY_MS")]
    analysis_delay_ms: Option<u64>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, env = "WEAVER_LOG")]
    log_level: Option<String>,

    /// Config file (default: platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(config::config_file_path);
    let toml_config = match &config_path {
        Some(path) => config::load_toml_config(path)?,
        None => Default::default(),
    };

    let server_config = ServerConfig::resolve(
        ServerOverrides {
            bind: args.bind,
            max_upload_bytes: args.max_upload_bytes,
            analysis_delay_ms: args.analysis_delay_ms,
            log_level: args.log_level,
        },
        &toml_config,
    )?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&server_config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Stem Weaver server (weaver-server) v{}",
        env!("CARGO_PKG_VERSION")
    );
    match &config_path {
        Some(path) if path.exists() => info!("Config file: {}", path.display()),
        Some(path) => info!("Config file {} not found, using defaults", path.display()),
        None => info!("No config directory, using defaults"),
    }
    info!(
        max_upload_bytes = server_config.max_upload_bytes,
        analysis_delay_ms = server_config.analysis_delay_ms,
        "Configuration resolved"
    );

    let state = AppState::new(&server_config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(server_config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", server_config.bind))?;
    info!("Listening on http://{}", server_config.bind);
    info!("Health check: http://{}/health", server_config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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
            info!("Received SIGTERM, shutting down");
        },
    }
}
