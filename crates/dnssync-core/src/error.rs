//! Error types for the DNS sync engine
//!
//! Per-file errors (`Input`, `Validation`, `Provider`) are caught by the
//! engine and recorded in the run report. Everything else that escapes
//! [`SyncEngine::run`](crate::SyncEngine::run) is fatal to the run.

use thiserror::Error;

/// Result type alias for DNS sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DNS sync engine
#[derive(Error, Debug)]
pub enum Error {
    /// Change report or record file content could not be parsed
    #[error("Input error: {0}")]
    Input(String),

    /// A record definition is missing a required field or carries an invalid value
    #[error("Validation error: {0}")]
    Validation(String),

    /// The version-control change source failed
    #[error("Change source error: {0}")]
    ChangeSource(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A DNS provider call failed
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an input error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a change source error
    pub fn change_source(msg: impl Into<String>) -> Self {
        Self::ChangeSource(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Short label for the error kind, used in per-file report lines
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Input(_) => "input",
            Error::Validation(_) => "validation",
            Error::ChangeSource(_) => "change-source",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Provider { .. } => "provider",
            Error::Other(_) => "other",
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
