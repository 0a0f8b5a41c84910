/// Audit event entity module
pub mod audit_event;
/// Rate limit counter entity module
pub mod rate_limit_counter;
/// Rate limit log entity module
pub mod rate_limit_log;

pub use audit_event::Entity as AuditEvent;
pub use rate_limit_counter::Entity as RateLimitCounter;
pub use rate_limit_log::Entity as RateLimitLog;
