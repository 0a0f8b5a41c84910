//! Notification channel implementations

use crate::config::EmailConfig;
use crate::monitoring::types::{Alert, AlertSeverity};
use crate::utils::error::{PortalError, Result};
use tracing::warn;

/// Notification channel trait
#[async_trait::async_trait]
pub trait NotificationChannel: Send + Sync + std::fmt::Debug {
    /// Send a notification
    async fn send(&self, alert: &Alert) -> Result<()>;

    /// Get channel name
    fn name(&self) -> &str;

    /// Check if channel supports severity level
    fn supports_severity(&self, severity: AlertSeverity) -> bool;
}

/// Console channel writing alerts to the process log
#[derive(Debug)]
pub struct LogChannel {
    min_severity: AlertSeverity,
}

impl LogChannel {
    pub fn new(min_severity: AlertSeverity) -> Self {
        Self { min_severity }
    }
}

impl Default for LogChannel {
    fn default() -> Self {
        Self::new(AlertSeverity::Info)
    }
}

#[async_trait::async_trait]
impl NotificationChannel for LogChannel {
    async fn send(&self, alert: &Alert) -> Result<()> {
        warn!(
            alert_id = %alert.id,
            severity = %alert.severity,
            source = %alert.source,
            "ALERT {}: {}",
            alert.title,
            alert.description
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }

    fn supports_severity(&self, severity: AlertSeverity) -> bool {
        severity >= self.min_severity
    }
}

/// Slack notification channel
#[derive(Debug)]
pub struct SlackChannel {
    client: reqwest::Client,
    webhook_url: String,
    channel: Option<String>,
    username: Option<String>,
    min_severity: AlertSeverity,
}

impl SlackChannel {
    /// Create a new Slack notification channel
    pub fn new(
        client: reqwest::Client,
        webhook_url: String,
        channel: Option<String>,
        username: Option<String>,
        min_severity: AlertSeverity,
    ) -> Self {
        Self {
            client,
            webhook_url,
            channel,
            username,
            min_severity,
        }
    }
}

#[async_trait::async_trait]
impl NotificationChannel for SlackChannel {
    async fn send(&self, alert: &Alert) -> Result<()> {
        let color = match alert.severity {
            AlertSeverity::Info => "#36a64f",
            AlertSeverity::Warning => "#ff9500",
            AlertSeverity::Critical => "#ff0000",
        };

        let payload = serde_json::json!({
            "username": self.username.as_deref().unwrap_or("Portal Alert"),
            "channel": self.channel,
            "attachments": [{
                "color": color,
                "title": alert.title,
                "text": alert.description,
                "fields": [
                    {
                        "title": "Severity",
                        "value": alert.severity.to_string(),
                        "short": true
                    },
                    {
                        "title": "Usage",
                        "value": alert.metadata["percentage"],
                        "short": true
                    },
                    {
                        "title": "Time",
                        "value": alert.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                        "short": true
                    }
                ],
                "footer": "Driver Portal",
                "ts": alert.timestamp.timestamp()
            }]
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortalError::Alert(format!("Failed to send Slack notification: {}", e)))?;

        if !response.status().is_success() {
            return Err(PortalError::Alert(format!(
                "Slack webhook returned status: {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "slack"
    }

    fn supports_severity(&self, severity: AlertSeverity) -> bool {
        severity >= self.min_severity
    }
}

/// Email notification channel backed by an HTTP mail relay
#[derive(Debug)]
pub struct EmailChannel {
    client: reqwest::Client,
    config: EmailConfig,
    min_severity: AlertSeverity,
}

impl EmailChannel {
    pub fn new(client: reqwest::Client, config: EmailConfig, min_severity: AlertSeverity) -> Self {
        Self {
            client,
            config,
            min_severity,
        }
    }

    fn subject(alert: &Alert) -> String {
        format!("[{}] {}", alert.severity, alert.title)
    }
}

#[async_trait::async_trait]
impl NotificationChannel for EmailChannel {
    async fn send(&self, alert: &Alert) -> Result<()> {
        let payload = serde_json::json!({
            "from": self.config.from_address,
            "to": self.config.to_addresses,
            "subject": Self::subject(alert),
            "text": format!(
                "{}\n\nTime: {}\nAlert ID: {}",
                alert.description,
                alert.timestamp.to_rfc3339(),
                alert.id
            ),
        });

        let mut request = self.client.post(&self.config.api_url).json(&payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PortalError::Alert(format!("Failed to send email notification: {}", e)))?;

        if !response.status().is_success() {
            return Err(PortalError::Alert(format!(
                "Email relay returned status: {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "email"
    }

    fn supports_severity(&self, severity: AlertSeverity) -> bool {
        severity >= self.min_severity
    }
}
