//! Tollgate server
//!
//! Activates the configured license at startup and serves the license API:
//! 1. `GET /api/v1/license` reports the active license
//! 2. `POST /api/v1/license/reload` re-reads the config and re-activates
//!
//! Usage:
//!   tollgate-server --config tollgate.toml
//!
//! A missing or rejected license does not stop the server; it runs unlicensed.
//! Only a config file that cannot be read or parsed is fatal.

use std::{path::PathBuf, sync::Arc};
use anyhow::{Context, Result};
use clap::Parser;
use tollgate_license::LicenseActivator;
use tollgate_server::{activate_at_startup, build_router, AppState, ServerConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "tollgate-server")]
#[command(about = "Tollgate server with license activation")]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP API port, overrides the config file
    #[arg(long)]
    http_port: Option<u16>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("Tollgate server starting...");
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    let activator =
        LicenseActivator::new().context("Embedded license public key is invalid")?;
    activate_at_startup(&activator, &mut config);

    let http_port = args.http_port.unwrap_or(config.http_port);
    let app = build_router(Arc::new(AppState {
        activator,
        config_path: args.config.clone(),
    }));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", http_port))
        .await
        .with_context(|| format!("Failed to bind HTTP port {}", http_port))?;
    info!("HTTP license endpoint listening on port {}", http_port);
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
