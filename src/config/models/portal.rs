//! Main portal configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Main portal configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PortalConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Global rate limit configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Alerting configuration
    #[serde(default)]
    pub alerting: AlertingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PortalConfig {
    /// Merge two configurations, with other taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        self.server = self.server.merge(other.server);
        self.storage = self.storage.merge(other.storage);
        self.rate_limit = self.rate_limit.merge(other.rate_limit);
        self.alerting = self.alerting.merge(other.alerting);
        self.logging = self.logging.merge(other.logging);
        self
    }
}
