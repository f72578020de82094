// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

mod api;
mod app;
mod config;
mod logic;
mod models;
mod mvu;
mod ui;
mod utils;

use std::sync::Arc;

use anyhow::{Context, anyhow};
use tracing_subscriber::EnvFilter;

use crate::api::ReqwestTransport;
use crate::config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER)),
        )
        .init();
    tracing::info!(api = %config.api_base_url, workers = config.workers, "starting");

    let transport = ReqwestTransport::new(config.api_base_url.clone())
        .context("Failed to build HTTP client")?;

    app::run(&config, Arc::new(transport)).map_err(|e| anyhow!("UI error: {e}"))
}
