//! Configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for PortalConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating portal configuration");

        self.server.validate()?;
        self.storage.validate()?;
        self.rate_limit.validate()?;
        self.alerting.validate()?;
        self.logging.validate()?;

        debug!("Portal configuration validation completed");
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(0) = self.workers {
            return Err("Server workers must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        self.database.validate()?;
        if self.memory.log_capacity == 0 {
            return Err("Memory log capacity must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        if self.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        let supported = ["sqlite:", "postgres://", "postgresql://"];
        if !supported.iter().any(|scheme| self.url.starts_with(scheme)) {
            return Err("Database URL must be a sqlite: or postgres:// URL".to_string());
        }

        if self.max_connections == 0 {
            return Err("Database max connections must be greater than 0".to_string());
        }

        if self.connection_timeout == 0 {
            return Err("Database connection timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.limit == 0 {
            return Err("Rate limit must be greater than 0".to_string());
        }

        if self.window_secs == 0 {
            return Err("Rate limit window must be greater than 0 seconds".to_string());
        }

        if self.limit > MAX_LIMIT {
            return Err(format!("Rate limit cannot exceed {}", MAX_LIMIT));
        }

        let durations = [
            ("window_secs", Some(self.window_secs)),
            ("alert_cooldown_secs", Some(self.alert_cooldown_secs)),
            ("stale_after_secs", self.stale_after_secs),
        ];
        for (name, secs) in durations {
            if secs.is_some_and(|secs| secs > MAX_DURATION_SECS) {
                return Err(format!(
                    "Rate limit {} cannot exceed {} seconds",
                    name, MAX_DURATION_SECS
                ));
            }
        }

        if self.alert_threshold == 0 {
            return Err("Alert threshold must be greater than 0".to_string());
        }

        if self.alert_threshold > self.limit {
            return Err(format!(
                "Alert threshold ({}) cannot exceed the rate limit ({})",
                self.alert_threshold, self.limit
            ));
        }

        if self.identifier.is_empty() || self.endpoint.is_empty() {
            return Err("Rate limit counter key cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Validate for AlertingConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(webhook) = &self.slack_webhook {
            if !webhook.starts_with("https://") && !webhook.starts_with("http://") {
                return Err("Slack webhook must be an http(s) URL".to_string());
            }
        }

        if let Some(email) = &self.email {
            if !email.api_url.starts_with("https://") && !email.api_url.starts_with("http://") {
                return Err("Email relay URL must be an http(s) URL".to_string());
            }
            if email.to_addresses.is_empty() {
                return Err("Email alerting requires at least one recipient".to_string());
            }
            if !email.from_address.contains('@') {
                return Err(format!("Invalid from address: {}", email.from_address));
            }
        }

        if self.timeout_secs == 0 {
            return Err("Notification timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let levels = ["trace", "debug", "info", "warn", "error"];
        if !levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!(
                "Unsupported log level: {}. Supported levels: {:?}",
                self.level, levels
            ));
        }
        Ok(())
    }
}
