//! Error type shared by all codecs in this crate.

use thiserror::Error;

/// Errors raised while reading or writing a representation.
#[derive(Debug, Error)]
pub enum DelphinError {
    /// The input text does not follow the format's syntax.
    #[error("{format} syntax error: {message}")]
    Syntax {
        format: &'static str,
        message: String,
    },

    /// The input parsed but does not describe a well-formed structure.
    #[error("invalid {format}: {message}")]
    Structure {
        format: &'static str,
        message: String,
    },

    /// A structure could not be written in the requested format.
    #[error("cannot encode {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
}

impl DelphinError {
    pub(crate) fn structure(format: &'static str, message: impl Into<String>) -> Self {
        Self::Structure {
            format,
            message: message.into(),
        }
    }

    pub(crate) fn encode(format: &'static str, message: impl Into<String>) -> Self {
        Self::Encode {
            format,
            message: message.into(),
        }
    }
}
