//! Utility modules for the portal
//!
//! - **error**: Error types and HTTP rendering
//! - **clock**: Time source abstraction used by the request gate

pub mod clock;
pub mod error;

use uuid::Uuid;

/// Generate a unique request ID
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
