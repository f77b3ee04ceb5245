//! # mgmt-api
//!
//! A thin, typed client for the Management API of an identity service.
//!
//! It covers three resource families: clients (applications), connections
//! (identity providers) and client grants (scopes an API grants to a client).
//! Every operation returns a [`PendingRequest`](request::PendingRequest) that
//! can be inspected and customized before it is executed.
//!
//! ## Features
//!
//! - **Typed results**: each endpoint knows whether it yields one object, a
//!   list, or nothing, and decodes the body accordingly
//! - **Request customization**: extra headers and query parameters can be
//!   added before execution
//! - **Pluggable transport**: [`Transport`](transport::Transport) abstracts the
//!   HTTP layer; [`ReqwestTransport`](transport::ReqwestTransport) is the default
//! - **Security**: the API token is never logged and is sanitized from error
//!   messages on request
//!
//! ## Architecture
//!
//! - [`config`] - Configuration loading from environment variables
//! - [`error`] - Error taxonomy shared by every operation
//! - [`mgmt_api`] - Endpoint catalogue and request construction
//! - [`models`] - Resource models for clients, connections and grants
//! - [`request`] - The pending request builder and executor
//! - [`shape`] - Result shapes used to decode response bodies
//! - [`transport`] - HTTP transport abstraction
//!
//! ## Configuration
//!
//! The binary reads:
//!
//! - `MGMT_DOMAIN`: Tenant domain, with or without scheme
//! - `MGMT_API_TOKEN`: Management API bearer token
//!
//! Optional:
//! - `MGMT_TIMEOUT_SECS`: Request timeout in seconds (default 30)
//! - `MGMT_LOG_BODIES`: Log request and response bodies at trace level
//! - `RUST_LOG`: Log level (e.g., `mgmt_api=debug`)
//!
//! ## Example
//!
//! ```no_run
//! use mgmt_api::{ConnectionFilter, MgmtApi};
//!
//! async fn example() -> Result<(), mgmt_api::error::MgmtError> {
//!     let api = MgmtApi::new("tenant.example.com", "token")?;
//!
//!     let filter = ConnectionFilter::new().with_strategy("auth0");
//!     for connection in api.list_connections(&filter)?.execute().await? {
//!         println!("{:?}", connection.name);
//!     }
//!
//!     api.delete_client("abc123")?.execute().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod mgmt_api;
pub mod models;
pub mod request;
pub mod shape;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use mgmt_api::{ConnectionFilter, FieldsFilter, MgmtApi};
