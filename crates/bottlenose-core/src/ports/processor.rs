//! Processor port: the contract with the external parser/generator.
//!
//! The core never builds command lines or reads process output itself. An
//! adapter (ACE in production, a fake in tests) turns a request into a
//! [`ProcessorResponse`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Per-request options on top of the adapter's static configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorOptions {
    /// Maximum number of results to return (`-n`).
    pub results: usize,
    /// Whether generic lexical entries may be used for unknown words.
    pub generics: bool,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            results: 1,
            generics: true,
        }
    }
}

impl ProcessorOptions {
    #[must_use]
    pub const fn with_results(mut self, results: usize) -> Self {
        self.results = results;
        self
    }

    #[must_use]
    pub const fn with_generics(mut self, generics: bool) -> Self {
        self.generics = generics;
        self
    }
}

/// One parse or realization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorResult {
    pub result_id: usize,
    /// SimpleMRS text.
    pub mrs: Option<String>,
    /// UDF derivation text.
    pub derivation: Option<String>,
    /// Realized string (generation only).
    pub surface: Option<String>,
}

/// Initial and internal token lattices in YY text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStreams {
    pub initial: Option<String>,
    pub internal: Option<String>,
}

/// Everything one processor invocation reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorResponse {
    /// The input as the processor received it.
    pub input: String,
    pub results: Vec<ProcessorResult>,
    /// Total number of analyses found, which may exceed `results.len()`.
    pub readings: Option<usize>,
    /// CPU time in milliseconds.
    pub tcpu: Option<u64>,
    /// Number of passive edges built.
    pub pedges: Option<u64>,
    pub tokens: TokenStreams,
    /// Informational messages (`NOTE:` lines).
    pub notes: Vec<String>,
    /// Error messages reported for this item.
    pub errors: Vec<String>,
}

/// Domain-specific errors for processor invocations.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The process could not be started.
    #[error("Failed to start processor: {0}")]
    StartFailed(String),

    /// The process did not finish within the configured time.
    #[error("Processor timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The process exited unsuccessfully.
    #[error("Processor failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    /// The process wrote output that could not be understood.
    #[error("Malformed processor output: {0}")]
    MalformedOutput(String),

    /// Reading from or writing to the process failed.
    #[error("Processor I/O error: {0}")]
    Io(String),
}

/// Parser/generator for a compiled grammar.
///
/// # Design Rules
///
/// - Express **intent** (parse this, generate from that), not a command line
/// - One call per request; implementations own process lifetime and timeouts
#[async_trait]
pub trait ProcessorPort: Send + Sync {
    /// Parse `input` with the grammar image at `grammar`.
    async fn parse(
        &self,
        grammar: &Path,
        input: &str,
        options: &ProcessorOptions,
    ) -> Result<ProcessorResponse, ProcessorError>;

    /// Realize surface strings for the SimpleMRS `mrs`.
    async fn generate(
        &self,
        grammar: &Path,
        mrs: &str,
        options: &ProcessorOptions,
    ) -> Result<ProcessorResponse, ProcessorError>;
}
