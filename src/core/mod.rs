//! Core functionality for the portal
//!
//! - **rate_limiter**: the global request gate and its persistence contracts
//! - **audit**: audit event sink

pub mod audit;
pub mod rate_limiter;
