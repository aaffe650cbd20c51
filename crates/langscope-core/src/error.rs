//! Error types for the Langscope engine.

use thiserror::Error;

/// Severity attached to a structured error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Degraded but usable result
    Warning,
    /// Operation failed; caller should retry or fall back
    Error,
}

/// Main error type for Langscope operations.
///
/// Analysis entry points return `Result<T, Error>`; a failure means the
/// caller gets no partial progress and confidence 0.
#[derive(Debug, Error)]
pub enum Error {
    /// A search pattern failed to compile
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern text
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or parameters (generic)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error (configuration file loading)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration parse error
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidPattern { .. } => "invalid_pattern",
            Error::Config(_) => "config",
            Error::InvalidInput(_) => "invalid_input",
            Error::Io(_) => "io",
            Error::ConfigParse(_) => "config_parse",
            Error::Serialization(_) => "serialization",
            Error::Other(_) => "other",
        }
    }

    /// Which component produced the error.
    pub fn component(&self) -> &'static str {
        match self {
            Error::InvalidPattern { .. } => "source-tracker",
            Error::Config(_) | Error::ConfigParse(_) | Error::Io(_) => "config",
            Error::InvalidInput(_) | Error::Other(_) => "engine",
            Error::Serialization(_) => "serialization",
        }
    }

    /// Severity of the error. Nothing in the core is fatal to the host.
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
