//! Error types for the core crate.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading configuration or setting up the process.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value could not be parsed.
    #[error("Invalid configuration: {name}={value:?} ({reason})")]
    InvalidConfiguration {
        name: String,
        value: String,
        reason: String,
    },

    /// The global logging subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl Error {
    pub fn invalid_configuration(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
