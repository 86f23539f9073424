//! # Pathkit Common
//!
//! Shared logging setup and render configuration for the pathkit crates.
//!
//! ## Features
//!
//! - Logging configuration on top of `tracing-subscriber`
//! - `RenderConfig`, loadable from JSON

use thiserror::Error;

pub mod config;
pub mod logging;

pub use config::RenderConfig;
pub use logging::{init_logging, try_init_logging, LogConfig, LogFormat};

/// Errors raised while loading configuration or installing logging.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config text is not valid JSON for `RenderConfig`.
    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// The global subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl ConfigError {
    /// Get the error category for log fields.
    pub fn category(&self) -> &'static str {
        match self {
            ConfigError::Json(_) => "json",
            ConfigError::Invalid(_) => "invalid",
            ConfigError::Logging(_) => "logging",
        }
    }
}
