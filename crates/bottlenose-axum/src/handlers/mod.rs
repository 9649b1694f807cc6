//! HTTP request handlers for the Axum web server.
//!
//! Handlers are thin wrappers that delegate to the core `Dispatcher`.

pub mod grammars;
pub mod processing;
