// Module declarations
mod types;
mod connection;
mod counter_ops;
mod log_ops;
mod audit_ops;

// Re-export public types
pub use types::{DatabaseBackendType, SeaOrmDatabase};
