//! Error taxonomy for request handling.
//!
//! Adapters map these to their own surfaces (HTTP status codes, CLI exit
//! codes). Only parameter validation aggregates; every other error aborts
//! the request immediately.

use bottlenose_delphin::DelphinError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::ports::ProcessorError;

/// One rejected query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamError {
    pub name: String,
    pub reason: String,
}

impl ParamError {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// Render the aggregated validation message, one indented line per parameter.
fn invalid_parameters_message(errors: &[ParamError]) -> String {
    let mut message = String::from("Invalid parameters:");
    for error in errors {
        message.push_str("\n  ");
        message.push_str(&error.to_string());
    }
    message
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// One or more query parameters failed validation.
    #[error("{}", invalid_parameters_message(.0))]
    InvalidParameters(Vec<ParamError>),

    /// No grammar is registered under the requested key.
    #[error("Grammar not found: {0}")]
    UnknownGrammar(String),

    /// The grammar is registered but its image is missing on disk.
    #[error("Grammar '{key}' is unavailable: {} does not exist", .path.display())]
    GrammarUnavailable { key: String, path: PathBuf },

    /// The requested output format is deliberately not provided.
    #[error("Output format {field}={format} is not implemented")]
    UnimplementedFormat {
        field: &'static str,
        format: &'static str,
    },

    /// The generation input is not a readable MRS.
    #[error("Invalid generation input: {0}")]
    InvalidGenerationInput(#[source] DelphinError),

    /// Running the processor failed.
    #[error(transparent)]
    Processor(#[from] ProcessorError),

    /// Processor output could not be decoded or re-encoded.
    #[error("Representation error: {0}")]
    Representation(#[from] DelphinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameters_lists_every_offender() {
        let err = ServiceError::InvalidParameters(vec![
            ParamError::new("results", "expected a non-negative integer, got 'many'"),
            ParamError::new("mrs", "expected one of json, simple, latex, null, got 'xml'"),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid parameters:\n  results: expected a non-negative integer, got 'many'\n  mrs: expected one of json, simple, latex, null, got 'xml'"
        );
    }
}
