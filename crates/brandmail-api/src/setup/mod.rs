//! Application setup and initialization
//!
//! Initialization logic extracted from main.rs for better organization and
//! testability.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use brandmail_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    // Initialize telemetry first
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let state = Arc::new(AppState::new(config.clone()));
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
