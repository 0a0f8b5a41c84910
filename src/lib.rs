//! # Driver Portal
//!
//! Backend for the taxi-driver operations portal. Every inbound request
//! passes through a single persisted global rate-limit gate before it is
//! routed. The gate admits a fixed number of requests per window, rejects
//! the rest with `429 Too Many Requests`, and raises operator alerts when
//! usage crosses a configured threshold.
//!
//! ## Features
//!
//! - **Persisted counter**: the window survives restarts and is shared by
//!   every instance pointing at the same database
//! - **Threshold alerting**: one alert per window, repeated after a cooldown
//! - **Request log**: every gate decision is recorded for later analysis
//! - **Fail closed**: storage failures reject the request with an opaque 500
//!
//! ## Running the portal
//!
//! ```rust,no_run
//! use driver_portal::{Config, Portal};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/portal.yaml").await?;
//!     let portal = Portal::new(config).await?;
//!     portal.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod monitoring;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::rate_limiter::{GateSettings, RateLimitGate, RequestInfo, Verdict};
pub use monitoring::alerts::AlertNotifier;
pub use storage::StorageLayer;
pub use utils::error::{PortalError, Result};

use tracing::info;

/// A running portal instance
pub struct Portal {
    config: Config,
    server: server::server::HttpServer,
}

impl Portal {
    /// Create a new portal instance
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating new portal instance");

        let server = server::server::HttpServer::new(&config).await?;

        Ok(Self { config, server })
    }

    /// Run the portal until the HTTP server stops
    pub async fn run(self) -> Result<()> {
        info!("Starting {} v{}", NAME, VERSION);
        info!(
            "Gate: {} requests per {}s",
            self.config.rate_limit().limit,
            self.config.rate_limit().window_secs
        );

        self.server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
