//! `ProcessorPort` implementation for ACE.
//!
//! This module provides the `AceRunner` which implements the
//! `ProcessorPort` trait from `bottlenose-core`. Every request starts a
//! fresh ACE process; nothing is shared between requests.

use async_trait::async_trait;
use bottlenose_core::{AceConfig, ProcessorError, ProcessorOptions, ProcessorPort, ProcessorResponse};
use std::io;
use std::path::Path;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::command::{Mode, build_command};
use crate::tsdb;

/// `ProcessorPort` implementation using the `ace` binary.
///
/// # Design
///
/// - Pure process concerns only
/// - One process per request, killed if it outlives the configured timeout
/// - Accepts `ProcessorOptions` and translates them to flags
#[derive(Debug, Clone)]
pub struct AceRunner {
    config: AceConfig,
}

impl AceRunner {
    /// Create a new `AceRunner`.
    pub const fn new(config: AceConfig) -> Self {
        Self { config }
    }

    /// The configuration this runner was built with.
    pub const fn config(&self) -> &AceConfig {
        &self.config
    }

    async fn run(
        &self,
        grammar: &Path,
        mode: Mode,
        input: &str,
        options: &ProcessorOptions,
    ) -> Result<ProcessorResponse, ProcessorError> {
        let mut cmd = build_command(&self.config, grammar, mode, options);
        debug!(
            executable = %self.config.executable.display(),
            grammar = %grammar.display(),
            mode = mode.as_str(),
            results = options.results,
            "Starting ACE"
        );

        let mut child = cmd.spawn().map_err(|e| {
            ProcessorError::StartFailed(format!("{}: {e}", self.config.executable.display()))
        })?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ProcessorError::Io("stdin was not captured".to_string()))?;

        // ACE reads one item per line.
        let payload = format!("{}\n", input.replace('\n', " "));
        let write = async move {
            match stdin.write_all(payload.as_bytes()).await {
                // ACE may exit before reading everything, e.g. on a bad grammar.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };

        let started = Instant::now();
        let timeout = self.config.timeout();
        // Dropping `child` on timeout kills the process.
        let output = tokio::time::timeout(timeout, async {
            tokio::try_join!(write, child.wait_with_output())
        })
        .await
        .map_err(|_| {
            warn!(
                grammar = %grammar.display(),
                mode = mode.as_str(),
                timeout_secs = timeout.as_secs(),
                "ACE timed out"
            );
            ProcessorError::Timeout(timeout)
        })?
        .map(|((), output)| output)
        .map_err(|e| ProcessorError::Io(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(
            status = %output.status,
            elapsed_ms = started.elapsed().as_millis(),
            stdout_bytes = output.stdout.len(),
            "ACE finished"
        );

        if !output.status.success() && stdout.trim().is_empty() {
            return Err(ProcessorError::Failed {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        for line in stderr.lines().filter(|l| !l.starts_with("NOTE:")) {
            debug!(line, "ACE stderr");
        }

        let response = tsdb::decode(input, &stdout, &stderr)?;
        for error in &response.errors {
            warn!(grammar = %grammar.display(), error = %error, "ACE reported an error");
        }
        Ok(response)
    }
}

#[async_trait]
impl ProcessorPort for AceRunner {
    async fn parse(
        &self,
        grammar: &Path,
        input: &str,
        options: &ProcessorOptions,
    ) -> Result<ProcessorResponse, ProcessorError> {
        self.run(grammar, Mode::Parse, input, options).await
    }

    async fn generate(
        &self,
        grammar: &Path,
        mrs: &str,
        options: &ProcessorOptions,
    ) -> Result<ProcessorResponse, ProcessorError> {
        self.run(grammar, Mode::Generate, mrs, options).await
    }
}
