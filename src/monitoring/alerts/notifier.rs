//! Threshold alert notifier

use super::channels::{EmailChannel, LogChannel, NotificationChannel, SlackChannel};
use super::types::{AlertStats, THRESHOLD_EXCEEDED_EVENT, ThresholdBreach};
use crate::config::AlertingConfig;
use crate::core::audit::{AuditEvent, AuditSink};
use crate::monitoring::types::AlertSeverity;
use crate::utils::error::Result;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Records threshold breaches in the audit log and fans them out to the
/// configured notification channels. Never fails its caller.
#[derive(Debug)]
pub struct AlertNotifier {
    audit: Arc<dyn AuditSink>,
    channels: Vec<Box<dyn NotificationChannel>>,
    stats: RwLock<AlertStats>,
}

impl AlertNotifier {
    pub fn new(audit: Arc<dyn AuditSink>, channels: Vec<Box<dyn NotificationChannel>>) -> Self {
        Self {
            audit,
            channels,
            stats: RwLock::new(AlertStats::default()),
        }
    }

    /// Build the channel set described by the alerting configuration
    pub fn from_config(config: &AlertingConfig, audit: Arc<dyn AuditSink>) -> Result<Self> {
        let mut channels: Vec<Box<dyn NotificationChannel>> = Vec::new();

        if config.log_channel {
            channels.push(Box::new(LogChannel::new(AlertSeverity::Info)));
        }

        if config.enabled {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()?;

            if let Some(webhook_url) = &config.slack_webhook {
                channels.push(Box::new(SlackChannel::new(
                    client.clone(),
                    webhook_url.clone(),
                    None,
                    Some("Portal Alert".to_string()),
                    AlertSeverity::Info,
                )));
            }

            if let Some(email) = &config.email {
                channels.push(Box::new(EmailChannel::new(
                    client,
                    email.clone(),
                    AlertSeverity::Info,
                )));
            }
        }

        let notifier = Self::new(audit, channels);
        info!(
            "Alert notifier ready with channels: {:?}",
            notifier.channel_names()
        );
        Ok(notifier)
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    pub fn stats(&self) -> AlertStats {
        self.stats.read().clone()
    }

    /// Record and deliver a breach. Audit and channel failures are logged
    /// and counted, never returned.
    pub async fn notify(&self, breach: &ThresholdBreach) {
        let alert = breach.to_alert();
        debug!("Raising alert {}: {}", alert.id, alert.description);

        {
            let mut stats = self.stats.write();
            stats.total_alerts += 1;
            stats.last_alert = Some(alert.timestamp);
        }

        let mut failures = 0u64;

        let event = AuditEvent::system(THRESHOLD_EXCEEDED_EVENT, breach.audit_log());
        if let Err(e) = self.audit.record(event).await {
            warn!("Failed to write threshold audit event: {}", e);
            failures += 1;
        }

        for channel in &self.channels {
            if !channel.supports_severity(alert.severity) {
                continue;
            }
            match channel.send(&alert).await {
                Ok(()) => debug!("Alert sent via {}", channel.name()),
                Err(e) => {
                    warn!("Failed to send alert via {}: {}", channel.name(), e);
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            self.stats.write().failed_notifications += failures;
        }
    }
}
