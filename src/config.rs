//! Configuration management for the Management API client.
//!
//! This module handles loading configuration from environment variables,
//! with validation to ensure all required values are present.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::MgmtError;
use crate::transport::{TransportConfig, DEFAULT_TIMEOUT_SECS};

/// Configuration for connecting to the Management API.
///
/// The API token is stored but never logged; `Debug` redacts it.
#[derive(Clone)]
pub struct Config {
    /// Tenant domain, with or without scheme (e.g. `tenant.example.com`).
    pub domain: String,

    /// Bearer token with the scopes needed for the intended operations.
    /// This value must never be logged or included in error messages.
    api_token: String,

    /// Per-request deadline.
    pub timeout: Duration,

    /// Log request and response bodies at `trace` level.
    pub log_bodies: bool,
}

impl Config {
    /// Creates a configuration with default transport settings.
    ///
    /// # Errors
    ///
    /// Returns `MgmtError::Config` if the domain or token is empty or the
    /// token looks like a placeholder.
    pub fn new(domain: impl Into<String>, api_token: impl Into<String>) -> Result<Self, MgmtError> {
        let domain = domain.into().trim().to_string();
        let api_token = api_token.into().trim().to_string();

        if domain.is_empty() {
            return Err(MgmtError::invalid_config("domain must not be empty"));
        }
        Self::validate_api_token(&api_token)?;

        Ok(Config {
            domain,
            api_token,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_bodies: false,
        })
    }

    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `MGMT_DOMAIN`: The tenant domain
    /// - `MGMT_API_TOKEN`: The Management API bearer token
    ///
    /// # Optional Environment Variables
    ///
    /// - `MGMT_TIMEOUT_SECS`: Request timeout in seconds (default 30)
    /// - `MGMT_LOG_BODIES`: `true` to log request/response bodies
    ///
    /// # Errors
    ///
    /// Returns `MgmtError::Config` if any required variable is missing
    /// or if values fail validation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// dotenvy::dotenv().ok();
    /// let config = Config::from_env()?;
    /// ```
    pub fn from_env() -> Result<Self, MgmtError> {
        let domain = Self::get_required_env("MGMT_DOMAIN")?;
        let api_token = Self::get_required_env("MGMT_API_TOKEN")?;

        let mut config = Self::new(domain, api_token)?;

        if let Some(raw) = Self::get_optional_env("MGMT_TIMEOUT_SECS") {
            config.timeout = Self::parse_timeout(&raw)?;
        }
        if let Some(raw) = Self::get_optional_env("MGMT_LOG_BODIES") {
            config.log_bodies = Self::parse_bool("MGMT_LOG_BODIES", &raw)?;
        }

        Ok(config)
    }

    /// Sets the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API token.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Transport settings derived from this configuration.
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig::default()
            .with_timeout(self.timeout)
            .with_body_logging(self.log_bodies)
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, MgmtError> {
        Self::get_optional_env(name).ok_or_else(|| MgmtError::missing_env(name))
    }

    fn get_optional_env(name: &str) -> Option<String> {
        env::var(name).ok().filter(|value| !value.trim().is_empty())
    }

    fn parse_timeout(raw: &str) -> Result<Duration, MgmtError> {
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(MgmtError::invalid_config(
                "MGMT_TIMEOUT_SECS must be a positive number of seconds",
            )),
        }
    }

    fn parse_bool(name: &str, raw: &str) -> Result<bool, MgmtError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(MgmtError::invalid_config(format!(
                "{} must be true or false",
                name
            ))),
        }
    }

    /// Validates the API token is present and not a placeholder value.
    fn validate_api_token(token: &str) -> Result<(), MgmtError> {
        if token.is_empty() {
            return Err(MgmtError::invalid_config("API token must not be empty"));
        }

        let token_lower = token.to_lowercase();
        let placeholder_patterns = ["your_api_token", "your_token", "placeholder", "changeme"];

        for pattern in placeholder_patterns {
            if token_lower.contains(pattern) {
                return Err(MgmtError::invalid_config(
                    "MGMT_API_TOKEN appears to be a placeholder value",
                ));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("domain", &self.domain)
            .field("api_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("log_bodies", &self.log_bodies)
            .finish()
    }
}
