//! signage-server - digital signage content manager
//!
//! Serves the asset API, the legacy management forms and the playlist
//! for playback clients.

use anyhow::{Context, Result};
use clap::Parser;
use signage_common::config::{load_config, CliOverrides, CompiledDefaults, Settings};
use signage_common::db::init::init_database;
use signage_common::time::SystemClock;
use signage_server::ingest::HttpProbe;
use signage_server::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Command-line arguments for signage-server
#[derive(Parser, Debug)]
#[command(name = "signage-server")]
#[command(about = "Digital signage content manager")]
#[command(version)]
struct Args {
    /// Folder holding the database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Folder for uploaded asset files
    #[arg(short, long)]
    asset_folder: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    listen_ip: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Folder served under /static
    #[arg(long)]
    static_folder: Option<PathBuf>,

    /// Config file (defaults to ~/.config/signage/config.toml, then /etc/signage/config.toml)
    #[arg(short, long, env = "SIGNAGE_CONFIG")]
    config: Option<PathBuf>,
}

/// Filter used when RUST_LOG is not set
fn default_filter(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!(
            "signage_server={0},signage_common={0},tower_http={0}",
            level
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing so its log level can apply
    let loaded = load_config(args.config.as_deref());
    let level = loaded
        .config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(&level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting signage-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    loaded.log_origin();

    let cli = CliOverrides {
        root_folder: args.root_folder,
        asset_folder: args.asset_folder,
        listen_ip: args.listen_ip,
        listen_port: args.port,
        static_folder: args.static_folder,
    };
    let settings = Settings::resolve(&cli, &loaded.config, CompiledDefaults::for_current_platform())
        .context("Invalid configuration")?;

    info!("Root folder: {}", settings.root_folder.display());
    info!("Asset folder: {}", settings.asset_folder.display());
    settings
        .ensure_folders()
        .context("Failed to create data folders")?;

    let pool = match init_database(&settings.database_path).await {
        Ok(pool) => {
            info!("Database ready: {}", settings.database_path.display());
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e).context("Failed to open database");
        }
    };

    let probe = HttpProbe::new(settings.fetch_timeout).context("Failed to build HTTP client")?;

    let addr = settings.listen_addr();
    let state = AppState::new(pool, settings, Arc::new(probe), Arc::new(SystemClock));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("signage-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

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
            error!("Failed to listen for Ctrl+C: {}", e);
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
            info!("Received terminate signal, shutting down");
        },
    }
}
