//! Global rate limiting with threshold alerting
//!
//! A single fixed-window counter guards the whole portal. Crossing the alert
//! threshold raises one alert per window, repeated only after the cooldown.

mod gate;
mod store;
mod types;


pub use gate::{GateSettings, RateLimitGate, retry_after_secs};
pub use store::{CounterStore, RateLimitLogStore};
pub use types::{
    CounterSnapshot, CounterUpdate, LogAction, NewLogEntry, RATE_LIMIT_EXCEEDED, RateLimitCounter,
    RateLimitLogEntry, RequestInfo, Verdict,
};
