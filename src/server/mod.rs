//! HTTP server implementation
//!
//! This module provides the HTTP server and routing functionality.

pub mod middleware;

pub mod builder;
mod handlers;
pub mod server;
pub mod state;
pub mod types;


pub use handlers::configure_routes;
