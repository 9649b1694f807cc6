//! CLI bootstrap - the composition root.
//!
//! Loads configuration, builds the grammar registry and wires the ACE
//! runner into a `Dispatcher`. Command handlers only see `CliContext`.

use std::path::PathBuf;
use std::sync::Arc;

use bottlenose_core::{AppConfig, Dispatcher, GrammarRegistry, ProcessorPort};
use bottlenose_runtime::AceRunner;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Config file given on the command line. Without it the
    /// `BOTTLENOSE_CONFIG` / `config.json` lookup applies.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Resolve the application config, then apply environment overrides.
    pub fn load<F>(&self, lookup: F) -> Result<AppConfig, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match &self.config_path {
            Some(path) => {
                let mut config = AppConfig::load(path)?;
                config.apply_env(lookup)?;
                config.validate()?;
                config
            }
            None => AppConfig::load_with_env(lookup)?,
        };
        Ok(config)
    }

    /// Resolve the application config against the process environment.
    pub fn resolve(&self) -> Result<AppConfig, CliError> {
        self.load(|name| std::env::var(name).ok())
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub dispatcher: Dispatcher,
}

/// Bootstrap the CLI context with the ACE processor.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, CliError> {
    let app_config = config.resolve()?;
    let processor: Arc<dyn ProcessorPort> = Arc::new(AceRunner::new(app_config.ace.clone()));
    bootstrap_with_processor(&app_config, processor)
}

/// Bootstrap with an explicit processor.
pub fn bootstrap_with_processor(
    config: &AppConfig,
    processor: Arc<dyn ProcessorPort>,
) -> Result<CliContext, CliError> {
    let registry = GrammarRegistry::from_config(&config.grammars)?;
    tracing::debug!(
        ace = %config.ace.executable.display(),
        grammars = registry.len(),
        "CLI bootstrap resolved configuration"
    );
    Ok(CliContext {
        dispatcher: Dispatcher::new(Arc::new(registry), processor),
    })
}
