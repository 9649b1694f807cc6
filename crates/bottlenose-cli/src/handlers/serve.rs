//! `bottlenose serve`: run the HTTP server.

use bottlenose_axum::{ServerConfig, start_server};
use bottlenose_core::AppConfig;

use crate::error::CliError;

/// Combine the config file's listen address with command-line overrides.
pub fn server_config(config: &AppConfig, host: Option<String>, port: Option<u16>) -> ServerConfig {
    let mut server = ServerConfig::from_app_config(config);
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server = server.with_port(port);
    }
    server
}

pub async fn execute(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), CliError> {
    let server = server_config(config, host, port);
    start_server(config, server)
        .await
        .map_err(|e: anyhow::Error| CliError::Core(format!("{e:#}")))
}
