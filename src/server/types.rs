//! Server response types

use serde::Serialize;

/// Body of a global rate limit rejection
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RateLimitExceededBody {
    pub error: &'static str,
    pub message: &'static str,
    #[serde(rename = "retryAfter")]
    pub retry_after: u64,
}

impl RateLimitExceededBody {
    pub fn new(retry_after: u64) -> Self {
        Self {
            error: "Too many requests",
            message: "Rate limit exceeded. Please try again later.",
            retry_after,
        }
    }
}

/// Server health status
#[derive(Debug, Clone, Serialize)]
pub struct ServerHealth {
    /// Server status
    pub status: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: &'static str,
    /// Storage health
    pub storage: crate::storage::StorageHealthStatus,
}

/// Rate limit status report
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitStatus {
    pub enabled: bool,
    pub counter: crate::core::rate_limiter::CounterSnapshot,
    pub alerts: crate::monitoring::alerts::AlertStats,
}
