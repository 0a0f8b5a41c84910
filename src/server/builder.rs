//! Server builder and run_server function
//!
//! This module provides the ServerBuilder for easier server configuration
//! and the run_server function for configuration loading.

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{PortalError, Result};
use std::path::Path;
use tracing::{info, warn};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/portal.yaml";

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| PortalError::Config("Configuration is required".to_string()))?;

        HttpServer::new(&config).await
    }
}

/// Load configuration from `path` if it exists, otherwise from defaults,
/// then apply environment overrides
pub async fn load_config(path: &Path) -> Result<Config> {
    let base = if path.exists() {
        info!("Loading configuration file: {}", path.display());
        Config::from_file(path).await?
    } else {
        warn!(
            "Configuration file {} not found, using defaults",
            path.display()
        );
        Config::default()
    };

    let config = base.with_env_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Run the server with the given configuration
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting driver portal");

    let server = ServerBuilder::new().with_config(config).build().await?;
    info!(
        "Server starting at: http://{}:{}",
        server.config().host,
        server.config().port
    );
    info!("   GET  /health - Health check");
    info!("   GET  /admin/rate-limit - Global rate limit status");

    server.start().await
}
