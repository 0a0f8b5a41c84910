//! Threshold alerting
//!
//! Breaches of the global alert threshold are written to the audit log and
//! delivered best-effort through notification channels.

mod channels;
mod notifier;
mod types;

pub use channels::{EmailChannel, LogChannel, NotificationChannel, SlackChannel};
pub use notifier::AlertNotifier;
pub use types::{AlertStats, THRESHOLD_EXCEEDED_EVENT, ThresholdBreach};
