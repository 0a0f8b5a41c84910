//! Alert types and data structures

use crate::monitoring::types::{Alert, AlertSeverity};

/// Audit event name for threshold breaches
pub const THRESHOLD_EXCEEDED_EVENT: &str = "rate_limit_threshold_exceeded";

/// Description of a global threshold breach
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdBreach {
    pub identifier: String,
    pub endpoint: String,
    pub current_count: i32,
    pub limit: u32,
    pub threshold: u32,
}

impl ThresholdBreach {
    /// Usage as a share of the limit, e.g. `"50.0%"`
    pub fn percentage(&self) -> String {
        let ratio = if self.limit == 0 {
            0.0
        } else {
            f64::from(self.current_count) / f64::from(self.limit)
        };
        format!("{:.1}%", ratio * 100.0)
    }

    pub fn message(&self) -> String {
        format!(
            "Global rate limit threshold exceeded for {}/{}: {} of {} requests used ({}), alert threshold is {}",
            self.identifier,
            self.endpoint,
            self.current_count,
            self.limit,
            self.percentage(),
            self.threshold
        )
    }

    /// Critical once the limit itself is reached
    pub fn severity(&self) -> AlertSeverity {
        if i64::from(self.current_count) >= i64::from(self.limit) {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        }
    }

    /// Structured audit payload
    pub fn audit_log(&self) -> serde_json::Value {
        serde_json::json!({
            "identifier": self.identifier,
            "endpoint": self.endpoint,
            "currentCount": self.current_count,
            "limit": self.limit,
            "threshold": self.threshold,
            "percentage": self.percentage(),
            "message": self.message(),
        })
    }

    pub fn to_alert(&self) -> Alert {
        Alert {
            id: uuid::Uuid::new_v4().to_string(),
            severity: self.severity(),
            title: "Rate limit threshold exceeded".to_string(),
            description: self.message(),
            timestamp: chrono::Utc::now(),
            source: "rate_limiter".to_string(),
            metadata: self.audit_log(),
        }
    }
}

/// Alert statistics
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct AlertStats {
    /// Total alerts raised
    pub total_alerts: u64,
    /// Failed audit writes and channel deliveries
    pub failed_notifications: u64,
    /// Last alert timestamp
    pub last_alert: Option<chrono::DateTime<chrono::Utc>>,
}
