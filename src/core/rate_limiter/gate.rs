//! Global request gate
//!
//! One persisted counter is shared by every inbound request. Each check runs
//! housekeeping, window rollover, admission and threshold alerting against
//! that counter, then writes an entry to the rate limit log.

use super::store::{CounterStore, RateLimitLogStore};
use super::types::{
    CounterSnapshot, CounterUpdate, LogAction, NewLogEntry, RATE_LIMIT_EXCEEDED, RateLimitCounter,
    RequestInfo, Verdict,
};
use crate::config::RateLimitConfig;
use crate::monitoring::alerts::{AlertNotifier, ThresholdBreach};
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::error::{PortalError, Result};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Gate parameters, fixed at startup
#[derive(Debug, Clone, PartialEq)]
pub struct GateSettings {
    pub limit: u32,
    pub window: Duration,
    pub alert_threshold: u32,
    pub alert_cooldown: Duration,
    pub identifier: String,
    pub endpoint: String,
    /// Counters whose window ended more than this long ago are deleted
    pub stale_after: Duration,
}

impl GateSettings {
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self {
            limit: config.limit,
            window: config.window(),
            alert_threshold: config.alert_threshold,
            alert_cooldown: config.alert_cooldown(),
            identifier: config.identifier.clone(),
            endpoint: config.endpoint.clone(),
            stale_after: config.stale_after(),
        }
    }
}

impl Default for GateSettings {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}

/// Global rate limit gate
#[derive(Debug)]
pub struct RateLimitGate {
    settings: GateSettings,
    counters: Arc<dyn CounterStore>,
    logs: Arc<dyn RateLimitLogStore>,
    notifier: Arc<AlertNotifier>,
    clock: Arc<dyn Clock>,
    /// Serialises the counter read-modify-write
    write_lock: Mutex<()>,
}

impl RateLimitGate {
    pub fn new(
        settings: GateSettings,
        counters: Arc<dyn CounterStore>,
        logs: Arc<dyn RateLimitLogStore>,
        notifier: Arc<AlertNotifier>,
    ) -> Self {
        Self {
            settings,
            counters,
            logs,
            notifier,
            clock: Arc::new(SystemClock),
            write_lock: Mutex::new(()),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &GateSettings {
        &self.settings
    }

    pub fn notifier(&self) -> &Arc<AlertNotifier> {
        &self.notifier
    }

    /// Evaluate one request against the global counter
    ///
    /// Store failures are returned as errors; callers must not admit the
    /// request in that case.
    pub async fn check(&self, request: &RequestInfo) -> Result<Verdict> {
        let settings = &self.settings;
        let guard = self.write_lock.lock().await;
        let now = self.clock.now();

        let cutoff = now.checked_sub_signed(settings.stale_after).ok_or_else(|| {
            PortalError::config("Rate limit stale_after is out of range for the current time")
        })?;
        let removed = self.counters.delete_expired(cutoff).await?;
        if removed > 0 {
            debug!("Removed {} stale rate limit counters", removed);
        }

        let mut counter = self.load_or_create(now).await?;

        if now > counter.window_reset_at {
            let rollover = CounterUpdate::rollover(self.window_end(now)?).at(now);
            self.counters
                .update(&settings.identifier, &settings.endpoint, rollover.clone())
                .await?;
            rollover.apply_to(&mut counter);
            debug!(
                "Rate limit window rolled over, next reset at {}",
                counter.window_reset_at
            );
        }

        // Widened so a count at the column maximum still compares against the limit.
        let next = i64::from(counter.request_count) + 1;

        let new_count = match i32::try_from(next) {
            Ok(count) if next <= i64::from(settings.limit) => count,
            _ => {
                drop(guard);
                let new_count = i32::try_from(next).unwrap_or(i32::MAX);
                let retry_after = retry_after_secs(counter.window_reset_at, now);
                warn!(
                    "Global rate limit exceeded on {}: {} > {}, retry after {}s",
                    request.path, next, settings.limit, retry_after
                );
                self.logs
                    .append(self.log_entry(request, LogAction::BlockedGlobal, new_count, now))
                    .await?;
                return Ok(Verdict::Blocked {
                    retry_after,
                    reason: RATE_LIMIT_EXCEEDED,
                });
            }
        };

        let mut update = CounterUpdate::count(new_count).at(now);
        let fire_alert = self.should_alert(&counter, new_count, now);
        if fire_alert {
            update.is_over_threshold = Some(true);
            update.last_alert_sent_at = Some(now);
            update.alert_count = Some(counter.alert_count.saturating_add(1));
        }

        self.counters
            .update(&settings.identifier, &settings.endpoint, update)
            .await?;
        drop(guard);

        if fire_alert {
            self.notifier
                .notify(&ThresholdBreach {
                    identifier: settings.identifier.clone(),
                    endpoint: settings.endpoint.clone(),
                    current_count: new_count,
                    limit: settings.limit,
                    threshold: settings.alert_threshold,
                })
                .await;
        }

        self.logs
            .append(self.log_entry(request, LogAction::Allowed, new_count, now))
            .await?;

        debug!(
            "Request to {} admitted ({}/{})",
            request.path, new_count, settings.limit
        );
        Ok(Verdict::Allowed { count: new_count })
    }

    /// Current state of the global counter without counting a request
    pub async fn snapshot(&self) -> Result<CounterSnapshot> {
        let settings = &self.settings;
        let counter = {
            let _guard = self.write_lock.lock().await;
            self.counters
                .get(&settings.identifier, &settings.endpoint)
                .await?
        };
        let now = self.clock.now();

        let (count, window_reset_at, is_over_threshold, alert_count) = match counter {
            Some(c) if now <= c.window_reset_at => (
                c.request_count,
                Some(c.window_reset_at),
                c.is_over_threshold,
                c.alert_count,
            ),
            Some(c) => (0, None, false, c.alert_count),
            None => (0, None, false, 0),
        };

        let used = u32::try_from(count.max(0)).unwrap_or(u32::MAX);
        Ok(CounterSnapshot {
            identifier: settings.identifier.clone(),
            endpoint: settings.endpoint.clone(),
            count,
            limit: settings.limit,
            remaining: settings.limit.saturating_sub(used),
            window_reset_at,
            is_over_threshold,
            alert_count,
        })
    }

    async fn load_or_create(&self, now: DateTime<Utc>) -> Result<RateLimitCounter> {
        let settings = &self.settings;
        match self
            .counters
            .get(&settings.identifier, &settings.endpoint)
            .await?
        {
            Some(counter) => Ok(counter),
            None => {
                debug!(
                    "Creating rate limit counter {}/{}",
                    settings.identifier, settings.endpoint
                );
                self.counters
                    .create(
                        &settings.identifier,
                        &settings.endpoint,
                        0,
                        self.window_end(now)?,
                        now,
                    )
                    .await
            }
        }
    }

    fn window_end(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        now.checked_add_signed(self.settings.window).ok_or_else(|| {
            PortalError::config("Rate limit window is out of range for the current time")
        })
    }

    fn should_alert(&self, counter: &RateLimitCounter, new_count: i32, now: DateTime<Utc>) -> bool {
        let first_crossing = i64::from(new_count) >= i64::from(self.settings.alert_threshold)
            && !counter.is_over_threshold;

        // Repeats only look at the cooldown, not the current count.
        let cooled_down = counter.is_over_threshold
            && counter
                .last_alert_sent_at
                .is_some_and(|sent| now - sent > self.settings.alert_cooldown);

        first_crossing || cooled_down
    }

    fn log_entry(
        &self,
        request: &RequestInfo,
        action: LogAction,
        global_count: i32,
        now: DateTime<Utc>,
    ) -> NewLogEntry {
        NewLogEntry {
            identifier: self.settings.identifier.clone(),
            endpoint: request.path.clone(),
            action,
            global_count,
            ip_count: None,
            user_agent: request.user_agent.clone(),
            country: request.country.clone(),
            created_at: now,
        }
    }
}

/// Whole seconds until `reset_at`, rounded up, never negative
pub fn retry_after_secs(reset_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (reset_at - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        ((millis + 999) / 1000) as u64
    }
}
