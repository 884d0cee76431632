//! Error types for dynoload

use thiserror::Error;

/// Result type alias for dynoload operations
pub type Result<T> = std::result::Result<T, LoadError>;

/// Main error type for dynoload
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Batch write error: {0}")]
    Write(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl LoadError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a batch write error
    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    /// Create a source error
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }
}
