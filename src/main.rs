//! mgmt-api - command line client for the Management API
//!
//! Runs a single operation against a tenant and prints the result as
//! pretty-printed JSON on stdout. Logs go to stderr.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `MGMT_DOMAIN`: Tenant domain
//! - `MGMT_API_TOKEN`: Management API bearer token
//!
//! # Usage
//!
//! ```bash
//! mgmt-api clients list
//! mgmt-api connections list --strategy auth0 --fields name,id
//! mgmt-api grants create --client-id abc --audience https://api.example.com --scope read:users
//! ```

mod cli;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use mgmt_api::config::Config;
use mgmt_api::MgmtApi;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    let args = cli::Cli::parse();

    // stdout is reserved for command output
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mgmt_api=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if args.log_bodies {
        config.log_bodies = true;
    }

    tracing::debug!("Configuration loaded, domain: {}", config.domain);

    let api = MgmtApi::from_config(&config).context("Failed to create API client")?;

    tracing::debug!(base_url = %api.base_url(), "API client initialized");

    // The runtime prints the returned error once, on stderr.
    if let Err(e) = cli::run(&api, args.command).await {
        anyhow::bail!(cli::error_message(&e, api.api_token_for_sanitization()));
    }

    Ok(())
}
