//! Driver portal - HTTP backend with a global request gate

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use driver_portal::config::LoggingConfig;
use driver_portal::server::builder::{self, DEFAULT_CONFIG_PATH};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "portal", version, about = "Driver portal backend")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "PORTAL_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level).context("invalid log level")?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let result = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = builder::load_config(&args.config).await?;
    if let Some(host) = args.host {
        config.portal.server.host = host;
    }
    if let Some(port) = args.port {
        config.portal.server.port = port;
    }
    config.validate()?;

    init_tracing(config.logging())?;
    builder::run_server(config).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps multi-line bind errors readable
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
