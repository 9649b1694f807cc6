//! Axum-specific error types and mappings.
//!
//! This module provides the error type for the Axum adapter and the mapping
//! from `ServiceError` to HTTP status codes and response bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bottlenose_core::{ProcessorError, ServiceError};
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid parameters or callback).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unknown grammar.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Output format that is deliberately not provided.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Grammar configured but not installed.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The processor ran out of time.
    #[error("Gateway timeout: {0}")]
    GatewayTimeout(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::NotImplemented(msg)
            | Self::ServiceUnavailable(msg)
            | Self::GatewayTimeout(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            error: self.message(),
            status: status.as_u16(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::InvalidParameters(_) => Self::BadRequest(message),
            ServiceError::UnknownGrammar(_) => Self::NotFound(message),
            ServiceError::GrammarUnavailable { .. } => Self::ServiceUnavailable(message),
            ServiceError::UnimplementedFormat { .. } => Self::NotImplemented(message),
            ServiceError::Processor(ProcessorError::Timeout(_)) => Self::GatewayTimeout(message),
            ServiceError::InvalidGenerationInput(_)
            | ServiceError::Processor(_)
            | ServiceError::Representation(_) => Self::Internal(message),
        }
    }
}
