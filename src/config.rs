// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Runtime configuration loaded from the environment.
//!
//! A `.env` file in the working directory is honoured for local development.

use url::Url;

/// Backend used when `DOTBLOG_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "dotblog_cms=info";

/// Source repository linked from the header.
pub const REPOSITORY_URL: &str = "https://github.com/MaoShizhong/dotBLOG-CMS";

const DEFAULT_WORKERS: usize = 2;

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Settings needed to talk to the backend and run the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL every endpoint path is appended to.
    pub api_base_url: Url,
    /// `tracing_subscriber::EnvFilter` directive string.
    pub log_filter: String,
    /// Number of background threads executing commands.
    pub workers: usize,
}

impl Config {
    /// Load configuration from process environment variables.
    ///
    /// `.env` loading is skipped in tests so they stay hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("DOTBLOG_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base_url = Url::parse(raw_url.trim()).map_err(|e| {
            ConfigError::InvalidValue("DOTBLOG_API_URL".to_string(), e.to_string())
        })?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue(
                "DOTBLOG_API_URL".to_string(),
                format!("unsupported scheme '{}'", api_base_url.scheme()),
            ));
        }

        let workers = match lookup("DOTBLOG_WORKERS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidValue("DOTBLOG_WORKERS".to_string(), e.to_string()))?
                .max(1),
            None => DEFAULT_WORKERS,
        };

        let log_filter = lookup("RUST_LOG")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            api_base_url,
            log_filter,
            workers,
        })
    }
}
