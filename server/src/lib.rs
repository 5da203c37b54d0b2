//! HTTP API and configuration for the Tollgate server.

pub mod config;

use axum::{extract::State, http::StatusCode, response::Json, routing::get, routing::post, Router};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tollgate_license::{ActivationOutcome, ActivationStatus, License, LicenseActivator};
use tracing::{error, warn};

pub use config::{LicenseConfig, ServerConfig};

/// Shared state behind the HTTP API.
#[derive(Debug)]
pub struct AppState {
    pub activator: LicenseActivator,
    /// Configuration file re-read on reload, if the server was started with one.
    pub config_path: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LicenseResponse {
    pub active: bool,
    pub license: Option<License>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReloadResponse {
    pub outcome: Option<ActivationStatus>,
    pub error: Option<String>,
    pub license: Option<License>,
}

impl ReloadResponse {
    fn failed(error: impl ToString) -> Self {
        Self {
            outcome: None,
            error: Some(error.to_string()),
            license: None,
        }
    }
}

/// Reads the configured license file and activates it.
///
/// A license file that cannot be read is logged and skipped, leaving the
/// active license untouched, so the server starts unlicensed instead of
/// failing. Returns `None` in that case.
pub fn activate_at_startup(
    activator: &LicenseActivator,
    config: &mut ServerConfig,
) -> Option<ActivationOutcome> {
    if let Err(e) = config.read_license() {
        error!(component = "license", "License file unavailable, running unlicensed: {:#}", e);
        return None;
    }
    Some(activator.activate_from(&*config))
}

async fn license_handler(State(app): State<Arc<AppState>>) -> Json<LicenseResponse> {
    let license = app.activator.state().snapshot();
    Json(LicenseResponse {
        active: license.is_some(),
        license: license.map(|l| (*l).clone()),
    })
}

async fn reload_handler(
    State(app): State<Arc<AppState>>,
) -> (StatusCode, Json<ReloadResponse>) {
    let Some(config_path) = app.config_path.clone() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ReloadResponse::failed("server was started without a config file")),
        );
    };

    let result = tokio::task::spawn_blocking(move || {
        let mut config = ServerConfig::load(&config_path)?;
        config.read_license()?;
        anyhow::Ok(app.activator.activate_from(&config))
    })
    .await;

    match result {
        Ok(Ok(outcome)) => (
            StatusCode::OK,
            Json(ReloadResponse {
                outcome: Some(outcome.status()),
                error: outcome.error().map(ToString::to_string),
                license: outcome.license().map(|l| (**l).clone()),
            }),
        ),
        Ok(Err(e)) => {
            warn!("License reload skipped: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ReloadResponse::failed(format!("{e:#}"))),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ReloadResponse::failed(e)),
        ),
    }
}

/// Build the HTTP API router over the given application state.
pub fn build_router(app: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/license", get(license_handler))
        .route("/api/v1/license/reload", post(reload_handler))
        .with_state(app)
}
