//! ACE process runtime for bottlenose.
//!
//! Implements [`ProcessorPort`](bottlenose_core::ProcessorPort) by running
//! the `ace` binary once per request and reading its `--tsdb-stdout`
//! output.

#![deny(unused_crate_dependencies)]

mod command;
mod runner;
pub mod tsdb;

// Re-export the main ProcessorPort implementation
pub use runner::AceRunner;

pub use command::{Mode, ace_args};

#[cfg(test)]
use tempfile as _;
