//! Error types for the SOC Copilot host layer.

use std::path::PathBuf;

use soc_copilot_core::CoreError;

/// Result type alias for host-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or feeding the dashboards.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error.
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON decode error for a backend response.
    #[error("Invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value failed validation.
    #[error("Invalid value for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// Error from the animation core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a validation error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}
