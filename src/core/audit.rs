//! Audit event sink
//!
//! Operational events (threshold breaches) are persisted as JSON documents
//! tagged with an event name and an optional acting user.

use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Event written to the audit log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEvent {
    /// Event name, e.g. `rate_limit_threshold_exceeded`
    pub event: String,
    /// Structured payload
    pub log: serde_json::Value,
    /// Acting user, `None` for system events
    pub user_id: Option<i64>,
}

impl AuditEvent {
    /// System event with no acting user
    pub fn system<S: Into<String>>(event: S, log: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            log,
            user_id: None,
        }
    }
}

/// Audit event as read back from a sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredAuditEvent {
    pub id: i64,
    pub event: String,
    pub log: serde_json::Value,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait AuditSink: Send + Sync + std::fmt::Debug {
    async fn record(&self, event: AuditEvent) -> Result<()>;

    /// Events with the given name, oldest first
    async fn events_named(&self, event: &str) -> Result<Vec<StoredAuditEvent>>;
}
