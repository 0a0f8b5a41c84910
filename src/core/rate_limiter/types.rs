//! Rate limiter types and data structures

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Stable reason code carried by every global rejection
pub const RATE_LIMIT_EXCEEDED: &str = "RATE_LIMIT_EXCEEDED";

/// Persisted request counter for one (identifier, endpoint) key
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitCounter {
    pub identifier: String,
    pub endpoint: String,
    /// Admitted requests in the current window
    pub request_count: i32,
    /// End of the current window
    pub window_reset_at: DateTime<Utc>,
    /// First alert of the window has fired
    pub is_over_threshold: bool,
    pub last_alert_sent_at: Option<DateTime<Utc>>,
    /// Lifetime number of alerts fired for this key
    pub alert_count: i32,
    pub updated_at: DateTime<Utc>,
}

/// Partial counter update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterUpdate {
    pub request_count: Option<i32>,
    pub window_reset_at: Option<DateTime<Utc>>,
    pub is_over_threshold: Option<bool>,
    pub last_alert_sent_at: Option<DateTime<Utc>>,
    pub alert_count: Option<i32>,
    /// Modification time; stores fall back to their own clock when unset
    pub updated_at: Option<DateTime<Utc>>,
}

impl CounterUpdate {
    /// Update that only sets the request count
    pub fn count(request_count: i32) -> Self {
        Self {
            request_count: Some(request_count),
            ..Default::default()
        }
    }

    /// Update that starts a fresh window ending at `reset_at`
    pub fn rollover(reset_at: DateTime<Utc>) -> Self {
        Self {
            request_count: Some(0),
            window_reset_at: Some(reset_at),
            is_over_threshold: Some(false),
            ..Default::default()
        }
    }

    /// Stamp the update with the caller's clock
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.updated_at = Some(now);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the set fields to a counter in place
    pub fn apply_to(&self, counter: &mut RateLimitCounter) {
        if let Some(count) = self.request_count {
            counter.request_count = count;
        }
        if let Some(reset_at) = self.window_reset_at {
            counter.window_reset_at = reset_at;
        }
        if let Some(over) = self.is_over_threshold {
            counter.is_over_threshold = over;
        }
        if let Some(sent_at) = self.last_alert_sent_at {
            counter.last_alert_sent_at = Some(sent_at);
        }
        if let Some(alerts) = self.alert_count {
            counter.alert_count = alerts;
        }
        if let Some(updated_at) = self.updated_at {
            counter.updated_at = updated_at;
        }
    }
}

/// Outcome recorded in the rate limit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    Allowed,
    /// Reserved for per-address limiting; never written by the global gate
    BlockedIp,
    BlockedGlobal,
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::Allowed => "allowed",
            LogAction::BlockedIp => "blocked_ip",
            LogAction::BlockedGlobal => "blocked_global",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "allowed" => Some(LogAction::Allowed),
            "blocked_ip" => Some(LogAction::BlockedIp),
            "blocked_global" => Some(LogAction::BlockedGlobal),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log entry to append
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    pub identifier: String,
    /// Path of the request that was evaluated
    pub endpoint: String,
    pub action: LogAction,
    pub global_count: i32,
    pub ip_count: Option<i32>,
    pub user_agent: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Log entry as read back from a store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateLimitLogEntry {
    pub id: i64,
    pub identifier: String,
    pub endpoint: String,
    pub action: LogAction,
    pub global_count: i32,
    pub ip_count: Option<i32>,
    pub user_agent: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request attributes the gate needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestInfo {
    pub path: String,
    pub user_agent: Option<String>,
    pub country: Option<String>,
}

impl RequestInfo {
    pub fn new<S: Into<String>>(path: S) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_country<S: Into<String>>(mut self, country: S) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// Admission decision for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Admitted; `count` is the window count including this request
    Allowed { count: i32 },
    /// Rejected; retry after `retry_after` seconds
    Blocked {
        retry_after: u64,
        reason: &'static str,
    },
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allowed { .. })
    }
}

/// Read-only view of the global counter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterSnapshot {
    pub identifier: String,
    pub endpoint: String,
    pub count: i32,
    pub limit: u32,
    pub remaining: u32,
    pub window_reset_at: Option<DateTime<Utc>>,
    pub is_over_threshold: bool,
    pub alert_count: i32,
}
