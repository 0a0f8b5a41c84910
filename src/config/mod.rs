//! Configuration management for the portal
//!
//! This module handles loading, validation, and management of all portal configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{PortalError, Result};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Main configuration struct for the portal
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Portal configuration
    pub portal: PortalConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PortalError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let portal: PortalConfig = serde_yaml::from_str(content)
            .map_err(|e| PortalError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { portal };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        let config = Self::default().with_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let portal = &mut self.portal;

        if let Some(host) = lookup("PORTAL_HOST") {
            portal.server.host = host;
        }
        if let Some(port) = lookup("PORTAL_PORT") {
            portal.server.port = parse_env("PORTAL_PORT", &port)?;
        }
        if let Some(workers) = lookup("PORTAL_WORKERS") {
            portal.server.workers = Some(parse_env("PORTAL_WORKERS", &workers)?);
        }

        if let Some(url) = lookup("DATABASE_URL") {
            portal.storage.database.url = url;
        }
        if let Some(max_conn) = lookup("DATABASE_MAX_CONNECTIONS") {
            portal.storage.database.max_connections =
                parse_env("DATABASE_MAX_CONNECTIONS", &max_conn)?;
        }

        if let Some(enabled) = lookup("RATE_LIMIT_ENABLED") {
            portal.rate_limit.enabled = parse_env("RATE_LIMIT_ENABLED", &enabled)?;
        }
        if let Some(limit) = lookup("RATE_LIMIT_LIMIT") {
            portal.rate_limit.limit = parse_env("RATE_LIMIT_LIMIT", &limit)?;
        }
        if let Some(window) = lookup("RATE_LIMIT_WINDOW_SECS") {
            portal.rate_limit.window_secs = parse_env("RATE_LIMIT_WINDOW_SECS", &window)?;
        }
        if let Some(threshold) = lookup("RATE_LIMIT_ALERT_THRESHOLD") {
            portal.rate_limit.alert_threshold =
                parse_env("RATE_LIMIT_ALERT_THRESHOLD", &threshold)?;
        }
        if let Some(cooldown) = lookup("RATE_LIMIT_ALERT_COOLDOWN_SECS") {
            portal.rate_limit.alert_cooldown_secs =
                parse_env("RATE_LIMIT_ALERT_COOLDOWN_SECS", &cooldown)?;
        }

        if let Some(webhook) = lookup("ALERT_SLACK_WEBHOOK") {
            portal.alerting.slack_webhook = Some(webhook);
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            portal.logging.level = level;
        }
        if let Some(json) = lookup("LOG_JSON") {
            portal.logging.json = parse_env("LOG_JSON", &json)?;
        }

        Ok(self)
    }

    pub fn server(&self) -> &ServerConfig {
        &self.portal.server
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.portal.storage
    }

    pub fn rate_limit(&self) -> &RateLimitConfig {
        &self.portal.rate_limit
    }

    pub fn alerting(&self) -> &AlertingConfig {
        &self.portal.alerting
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.portal.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        Validate::validate(&self.portal).map_err(PortalError::Config)
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.portal = self.portal.merge(other.portal);
        self
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.portal)
            .map_err(|e| PortalError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| PortalError::Config(format!("Invalid {}: {}", key, e)))
}
