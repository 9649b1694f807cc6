//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter. All concrete implementations are instantiated here.

use std::sync::Arc;

use anyhow::{Context, Result};
use bottlenose_core::ports::ProcessorPort;
use bottlenose_core::{AppConfig, Dispatcher, GrammarRegistry};
use bottlenose_runtime::AceRunner;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

impl CorsConfig {
    /// An empty origin list allows every origin.
    pub fn from_origins(origins: &[String]) -> Self {
        if origins.is_empty() {
            Self::AllowAll
        } else {
            Self::AllowOrigins(origins.to_vec())
        }
    }
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Take the listen address and CORS policy from the application config.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            cors: CorsConfig::from_origins(&config.cors_origins),
        }
    }

    /// Override the listen port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// Request orchestration over the grammar registry and processor.
    pub dispatcher: Dispatcher,
    /// Whether `callback=` may wrap responses.
    pub allow_jsonp: bool,
}

impl AxumContext {
    pub const fn new(dispatcher: Dispatcher, allow_jsonp: bool) -> Self {
        Self {
            dispatcher,
            allow_jsonp,
        }
    }
}

/// Bootstrap the Axum context with the ACE processor.
pub fn bootstrap(config: &AppConfig) -> Result<AxumContext> {
    let processor: Arc<dyn ProcessorPort> = Arc::new(AceRunner::new(config.ace.clone()));
    bootstrap_with_processor(config, processor)
}

/// Bootstrap with an explicit processor (tests and alternative processors).
pub fn bootstrap_with_processor(
    config: &AppConfig,
    processor: Arc<dyn ProcessorPort>,
) -> Result<AxumContext> {
    let registry =
        GrammarRegistry::from_config(&config.grammars).context("Invalid grammar configuration")?;

    tracing::info!(
        target: "bottlenose.config",
        ace = %config.ace.executable.display(),
        timeout_secs = config.ace.timeout_secs,
        grammars = registry.len(),
        allow_jsonp = config.allow_jsonp,
        "Axum bootstrap resolved configuration"
    );
    for grammar in registry.summaries() {
        if grammar.available {
            tracing::debug!(grammar = %grammar.key, "Grammar available");
        } else {
            tracing::warn!(grammar = %grammar.key, "Grammar image is missing; requests will get 503");
        }
    }

    let dispatcher = Dispatcher::new(Arc::new(registry), processor);
    Ok(AxumContext::new(dispatcher, config.allow_jsonp))
}

/// Start the Axum server and serve until the process is stopped.
pub async fn start_server(app_config: &AppConfig, config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;
    use tracing::info;

    let ctx = bootstrap(app_config)?;
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("bottlenose listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_origins_allow_all() {
        assert_eq!(CorsConfig::from_origins(&[]), CorsConfig::AllowAll);
        assert_eq!(
            CorsConfig::from_origins(&["https://example.org".to_string()]),
            CorsConfig::AllowOrigins(vec!["https://example.org".to_string()])
        );
    }

    #[test]
    fn test_server_config_from_app_config() {
        let app = AppConfig {
            host: "0.0.0.0".into(),
            port: 9090,
            ..AppConfig::default()
        };
        let config = ServerConfig::from_app_config(&app);
        assert_eq!(config.addr(), "0.0.0.0:9090");
        assert_eq!(config.with_port(1).addr(), "0.0.0.0:1");
    }

    #[test]
    fn test_duplicate_grammars_fail_bootstrap() {
        let mut app = AppConfig::default();
        for key in ["erg", "ERG"] {
            app.grammars.push(bottlenose_core::GrammarConfig {
                key: key.into(),
                path: "/g/erg.dat".into(),
                description: None,
            });
        }
        assert!(bootstrap(&app).is_err());
    }
}
