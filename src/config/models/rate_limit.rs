//! Global rate limit configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Global rate limit configuration
///
/// Fixed at startup. One counter, keyed by `identifier` + `endpoint`, is
/// shared by every inbound request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    /// Enable the request gate
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum admitted requests per window
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Count at which the first alert of a window fires
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: u32,
    /// Minimum spacing between repeated alerts, in seconds
    #[serde(default = "default_alert_cooldown_secs")]
    pub alert_cooldown_secs: u64,
    /// Counter identifier key
    #[serde(default = "default_counter_key")]
    pub identifier: String,
    /// Counter endpoint key
    #[serde(default = "default_counter_key")]
    pub endpoint: String,
    /// How long past its reset time a counter must be before housekeeping
    /// deletes it. Defaults to one window.
    #[serde(default)]
    pub stale_after_secs: Option<u64>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: default_limit(),
            window_secs: default_window_secs(),
            alert_threshold: default_alert_threshold(),
            alert_cooldown_secs: default_alert_cooldown_secs(),
            identifier: default_counter_key(),
            endpoint: default_counter_key(),
            stale_after_secs: None,
        }
    }
}

impl RateLimitConfig {
    /// Merge rate limit configurations
    pub fn merge(mut self, other: Self) -> Self {
        if !other.enabled {
            self.enabled = false;
        }
        if other.limit != default_limit() {
            self.limit = other.limit;
        }
        if other.window_secs != default_window_secs() {
            self.window_secs = other.window_secs;
        }
        if other.alert_threshold != default_alert_threshold() {
            self.alert_threshold = other.alert_threshold;
        }
        if other.alert_cooldown_secs != default_alert_cooldown_secs() {
            self.alert_cooldown_secs = other.alert_cooldown_secs;
        }
        if other.identifier != default_counter_key() {
            self.identifier = other.identifier;
        }
        if other.endpoint != default_counter_key() {
            self.endpoint = other.endpoint;
        }
        if other.stale_after_secs.is_some() {
            self.stale_after_secs = other.stale_after_secs;
        }
        self
    }

    pub fn window(&self) -> chrono::Duration {
        duration_from_secs(self.window_secs)
    }

    pub fn alert_cooldown(&self) -> chrono::Duration {
        duration_from_secs(self.alert_cooldown_secs)
    }

    pub fn stale_after(&self) -> chrono::Duration {
        duration_from_secs(self.stale_after_secs.unwrap_or(self.window_secs))
    }
}

/// Longest accepted window, cooldown or stale cutoff (ten years)
pub const MAX_DURATION_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Largest limit the persisted `i32` counter can reach
pub const MAX_LIMIT: u32 = i32::MAX as u32;

fn duration_from_secs(secs: u64) -> chrono::Duration {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX)
}
