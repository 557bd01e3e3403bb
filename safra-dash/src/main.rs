//! safra-dash - IBGE vs CONAB planted-area dashboard server
//!
//! Loads the pre-computed datasets once at startup, then serves chart-ready
//! JSON and the dashboard page until Ctrl+C / SIGTERM.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use safra_common::config::{DataFolderResolver, DataPaths, TomlConfig};
use safra_dash::store::DatasetStore;
use safra_dash::{build_router, AppState};

/// Command-line arguments for safra-dash
#[derive(Parser, Debug)]
#[command(name = "safra-dash")]
#[command(about = "IBGE vs CONAB planted-area dashboard backend")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config)
    #[arg(short, long, env = "SAFRA_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(short, long)]
    bind: Option<String>,

    /// Data folder holding processados/ and geojson/
    #[arg(short, long, env = "SAFRA_DATA_FOLDER")]
    data_folder: Option<PathBuf>,

    /// Directory with the dashboard index.html and assets
    #[arg(long, env = "SAFRA_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Default filter when RUST_LOG is unset
fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!(
        "safra_dash={level},safra_common={level},tower_http={level}"
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; the level is refined once the config is read
    let (filter, filter_handle) = reload::Layer::new(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter("info")),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting safra-dash v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config = TomlConfig::load_or_default(args.config.as_deref());
    if std::env::var_os("RUST_LOG").is_none() {
        filter_handle
            .reload(default_filter(&config.logging.level))
            .context("Failed to apply configured log level")?;
    }

    let data_folder = DataFolderResolver::new(args.data_folder.as_deref(), Some(&config)).resolve();
    let paths = DataPaths::from_root(&data_folder);
    info!("Data folder: {}", data_folder.display());

    let store = DatasetStore::load(&paths);

    let static_dir = args.static_dir.or(config.static_dir);
    match &static_dir {
        Some(dir) => info!("Serving dashboard from {}", dir.display()),
        None => info!("No static directory configured, serving API only"),
    }

    let state = AppState::new(store, static_dir);
    let app = build_router(state);

    let bind = args.bind.unwrap_or(config.bind_addr);
    let port = args.port.unwrap_or(config.port);
    let addr = format!("{}:{}", bind, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("safra-dash listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
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
