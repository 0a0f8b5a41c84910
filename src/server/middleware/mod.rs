//! HTTP middleware implementations
//!
//! - Global rate limiting
//! - Request ID tracking

mod helpers;
mod rate_limit;
mod request_id;


pub use helpers::{extract_country, extract_request_id, extract_user_agent, request_info};
pub use rate_limit::{RateLimitMiddleware, RateLimitMiddlewareService};
pub use request_id::{REQUEST_ID_HEADER, RequestIdMiddleware, RequestIdMiddlewareService};
