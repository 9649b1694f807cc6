//! Axum web server adapter for bottlenose.
//!
//! Serves `/{grammar}/parse` and `/{grammar}/generate` over HTTP, plus
//! `/grammars` and `/health`. Errors are JSON bodies `{error, status}`;
//! successful bodies may be wrapped for JSON-P when configuration allows it.

#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for integration-only test deps
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod jsonp;
pub mod routes;
pub mod state;

// Re-export primary types
pub use bootstrap::{
    AxumContext, CorsConfig, ServerConfig, bootstrap, bootstrap_with_processor, start_server,
};
pub use error::HttpError;
pub use routes::create_router;
pub use state::AppState;
