//! Monitoring for the portal
//!
//! Operational alerts raised by the request gate.

pub mod alerts;
pub mod types;
