//! Command-line adapter for bottlenose.
//!
//! `bottlenose serve` runs the HTTP API; `parse`, `generate` and
//! `grammars` drive the same dispatcher from a shell.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use tempfile as _;

// Used by the binary only.
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliConfig, CliContext, bootstrap, bootstrap_with_processor};
pub use commands::{Commands, ParseParams};
pub use error::CliError;
pub use parser::Cli;
