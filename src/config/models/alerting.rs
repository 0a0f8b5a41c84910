//! Alerting configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Alerting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertingConfig {
    /// Enable external notification channels. Audit events are always written.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Echo alerts to the process log
    #[serde(default = "default_true")]
    pub log_channel: bool,
    /// Slack webhook URL
    pub slack_webhook: Option<String>,
    /// Email relay configuration
    pub email: Option<EmailConfig>,
    /// Timeout for outbound notification requests, in seconds
    #[serde(default = "default_notification_timeout")]
    pub timeout_secs: u64,
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_channel: true,
            slack_webhook: None,
            email: None,
            timeout_secs: default_notification_timeout(),
        }
    }
}

impl AlertingConfig {
    pub fn merge(mut self, other: Self) -> Self {
        if !other.enabled {
            self.enabled = false;
        }
        if !other.log_channel {
            self.log_channel = false;
        }
        if other.slack_webhook.is_some() {
            self.slack_webhook = other.slack_webhook;
        }
        if other.email.is_some() {
            self.email = other.email;
        }
        if other.timeout_secs != default_notification_timeout() {
            self.timeout_secs = other.timeout_secs;
        }
        self
    }
}

/// Email delivered through an HTTP mail relay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailConfig {
    /// Relay endpoint accepting a JSON message
    pub api_url: String,
    /// Bearer token for the relay
    #[serde(default)]
    pub api_key: Option<String>,
    /// From address
    pub from_address: String,
    /// To addresses
    pub to_addresses: Vec<String>,
}
