//! CLI-specific error types and mappings.
//!
//! Maps `ServiceError` and `ConfigError` to exit codes and user-facing
//! messages.

use bottlenose_core::{ConfigError, ServiceError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Anything without a more specific category.
    #[error("{0}")]
    Core(String),

    /// The request itself was wrong: bad parameters, unknown grammar,
    /// unreadable MRS.
    #[error("{0}")]
    Arguments(String),

    /// The grammar or output format cannot be served.
    #[error("{0}")]
    Unavailable(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// ACE failed, timed out or produced unreadable output.
    #[error("Process error: {0}")]
    Process(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where one fits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) => 2,   // EX_USAGE
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Process(_) => 71,    // EX_OSERR
            Self::Io(_) => 74,         // EX_IOERR
            Self::Config(_) => 78,     // EX_CONFIG
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::InvalidParameters(_)
            | ServiceError::UnknownGrammar(_)
            | ServiceError::InvalidGenerationInput(_) => Self::Arguments(message),
            ServiceError::GrammarUnavailable { .. } | ServiceError::UnimplementedFormat { .. } => {
                Self::Unavailable(message)
            }
            ServiceError::Processor(_) => Self::Process(message),
            ServiceError::Representation(_) => Self::Core(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Core(format!("Failed to render JSON: {err}"))
    }
}
