//! Endpoint catalog for the Management API.
//!
//! This module provides the `MgmtApi` struct. Each method maps one remote
//! operation to a [`PendingRequest`] with the right method, path, query
//! and body; nothing is sent until the caller executes it.
//!
//! Every request carries `Authorization: Bearer <token>`. Required
//! identifiers are checked before any URL is built; all other validation
//! is left to the server.
//!
//! # Security
//!
//! The API token is never logged and is redacted from `Debug` output.

use std::fmt;

use reqwest::Method;
use url::Url;

use crate::config::Config;
use crate::error::MgmtError;
use crate::models::{Client, ClientGrant, Connection, Resource};
use crate::request::{FieldBody, JsonBody, NoBody, PendingRequest};
use crate::shape::{List, Object, Void};
use crate::transport::{ReqwestTransport, Transport, TransportConfig};

const API_PATH: [&str; 2] = ["api", "v2"];
const CLIENT_GRANTS: &str = "client-grants";
const CLIENTS: &str = "clients";
const CONNECTIONS: &str = "connections";

/// Client for the Management API.
///
/// Holds the base URL, the bearer token and the transport. All three are
/// immutable after construction, so one instance can build and execute
/// any number of independent requests concurrently.
///
/// # Example
///
/// ```ignore
/// let api = MgmtApi::new("tenant.example.com", &token)?;
///
/// let clients = api.list_clients()?.execute().await?;
/// let rotated = api.rotate_client_secret("abc123")?.execute().await?;
/// ```
#[derive(Clone)]
pub struct MgmtApi<T = ReqwestTransport> {
    transport: T,
    base_url: Url,
    /// SECURITY: Never log this value!
    api_token: String,
}

impl MgmtApi<ReqwestTransport> {
    /// Creates a client for `domain` using the default reqwest transport.
    ///
    /// `domain` may omit the scheme, in which case `https://` is assumed.
    ///
    /// # Errors
    ///
    /// Returns `MgmtError::InvalidArgument` if the domain or token is empty
    /// or the domain can't be parsed as a URL.
    pub fn new(domain: &str, api_token: &str) -> Result<Self, MgmtError> {
        Self::with_transport_config(domain, api_token, &TransportConfig::default())
    }

    /// Creates a client with explicit transport settings.
    pub fn with_transport_config(
        domain: &str,
        api_token: &str,
        config: &TransportConfig,
    ) -> Result<Self, MgmtError> {
        // Validate arguments before paying for the HTTP client.
        let base_url = Self::create_base_url(domain)?;
        require(api_token, "api token")?;
        let transport = ReqwestTransport::new(config)?;
        Ok(Self {
            transport,
            base_url,
            api_token: api_token.to_string(),
        })
    }

    /// Creates a client from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, MgmtError> {
        Self::with_transport_config(
            &config.domain,
            config.api_token(),
            &config.transport_config(),
        )
    }
}

impl<T: Transport> MgmtApi<T> {
    /// Creates a client that sends requests through `transport`.
    ///
    /// # Errors
    ///
    /// Same as [`MgmtApi::new`].
    pub fn with_transport(domain: &str, api_token: &str, transport: T) -> Result<Self, MgmtError> {
        let base_url = Self::create_base_url(domain)?;
        require(api_token, "api token")?;
        Ok(Self {
            transport,
            base_url,
            api_token: api_token.to_string(),
        })
    }

    /// The normalized base URL, e.g. `https://tenant.example.com/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the API token for sanitization purposes.
    ///
    /// This should ONLY be used for sanitizing messages, never for logging.
    pub fn api_token_for_sanitization(&self) -> &str {
        &self.api_token
    }

    /// Builds the base URL from a domain, adding `https://` when no scheme
    /// is given.
    fn create_base_url(domain: &str) -> Result<Url, MgmtError> {
        require(domain, "domain")?;

        let candidate = if domain.starts_with("https://") || domain.starts_with("http://") {
            domain.to_string()
        } else {
            format!("https://{}", domain)
        };

        let mut url = Url::parse(&candidate).map_err(|e| {
            MgmtError::invalid_argument(format!(
                "the domain had an invalid format and couldn't be parsed as a URL: {}",
                e
            ))
        })?;
        if url.cannot_be_a_base() || url.host_str().map_or(true, str::is_empty) {
            return Err(MgmtError::invalid_argument(
                "the domain had an invalid format and couldn't be parsed as a URL",
            ));
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    /// Builds `{base}/api/v2/{segments...}`, encoding each segment.
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, MgmtError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MgmtError::invalid_argument("base URL cannot carry path segments"))?
            .pop_if_empty()
            .extend(API_PATH)
            .extend(segments);
        Ok(url)
    }

    /// Starts an authenticated request.
    fn request<S>(&self, method: Method, url: Url) -> PendingRequest<'_, T, S, NoBody> {
        PendingRequest::new(&self.transport, method, url)
            .add_header("Authorization", format!("Bearer {}", self.api_token))
            .add_header("Accept", "application/json")
    }

    // ========================================================================
    // Client grants
    // ========================================================================

    /// Lists all client grants. Requires the `read:client_grants` scope.
    pub fn list_client_grants(
        &self,
    ) -> Result<PendingRequest<'_, T, List<ClientGrant>>, MgmtError> {
        let url = self.endpoint_url(&[CLIENT_GRANTS])?;
        Ok(self.request(Method::GET, url))
    }

    /// Creates a client grant. Requires the `create:client_grants` scope.
    ///
    /// # Arguments
    ///
    /// * `client_id` - The client to associate the grant with
    /// * `audience` - The API identifier the grant applies to
    /// * `scope` - The scopes to grant (may be empty)
    pub fn create_client_grant<S: AsRef<str>>(
        &self,
        client_id: &str,
        audience: &str,
        scope: &[S],
    ) -> Result<PendingRequest<'_, T, Object<ClientGrant>, FieldBody>, MgmtError> {
        require(client_id, "client id")?;
        require(audience, "audience")?;

        let url = self.endpoint_url(&[CLIENT_GRANTS])?;
        self.request(Method::POST, url)
            .add_parameter("client_id", client_id)?
            .add_parameter("audience", audience)?
            .add_parameter("scope", scope_list(scope))
    }

    /// Deletes a client grant. Requires the `delete:client_grants` scope.
    pub fn delete_client_grant(
        &self,
        client_grant_id: &str,
    ) -> Result<PendingRequest<'_, T, Void>, MgmtError> {
        require(client_grant_id, "client grant id")?;

        let url = self.endpoint_url(&[CLIENT_GRANTS, client_grant_id])?;
        Ok(self.request(Method::DELETE, url))
    }

    /// Replaces the scopes of a client grant. Requires the
    /// `update:client_grants` scope.
    pub fn update_client_grant<S: AsRef<str>>(
        &self,
        client_grant_id: &str,
        scope: &[S],
    ) -> Result<PendingRequest<'_, T, Object<ClientGrant>, FieldBody>, MgmtError> {
        require(client_grant_id, "client grant id")?;

        let url = self.endpoint_url(&[CLIENT_GRANTS, client_grant_id])?;
        self.request(Method::PATCH, url)
            .add_parameter("scope", scope_list(scope))
    }

    // ========================================================================
    // Clients
    // ========================================================================

    /// Lists all clients. Requires the `read:clients` scope; secrets are
    /// only included with `read:client_keys`.
    pub fn list_clients(&self) -> Result<PendingRequest<'_, T, List<Client>>, MgmtError> {
        let url = self.endpoint_url(&[CLIENTS])?;
        Ok(self.request(Method::GET, url))
    }

    /// Gets a single client. Requires the `read:clients` scope.
    pub fn get_client(&self, client_id: &str) -> Result<PendingRequest<'_, T, Object<Client>>, MgmtError> {
        require(client_id, "client id")?;

        let url = self.endpoint_url(&[CLIENTS, client_id])?;
        Ok(self.request(Method::GET, url))
    }

    /// Creates a client. Requires the `create:clients` scope.
    pub fn create_client(
        &self,
        client: &Client,
    ) -> Result<PendingRequest<'_, T, Object<Client>, JsonBody>, MgmtError> {
        let url = self.endpoint_url(&[CLIENTS])?;
        self.request(Method::POST, url).set_body(&client.payload()?)
    }

    /// Updates a client with the fields set on `client`. Requires the
    /// `update:clients` scope (`update:client_keys` for secrets).
    pub fn update_client(
        &self,
        client_id: &str,
        client: &Client,
    ) -> Result<PendingRequest<'_, T, Object<Client>, JsonBody>, MgmtError> {
        require(client_id, "client id")?;

        let url = self.endpoint_url(&[CLIENTS, client_id])?;
        self.request(Method::PATCH, url).set_body(&client.payload()?)
    }

    /// Deletes a client. Requires the `delete:clients` scope.
    pub fn delete_client(&self, client_id: &str) -> Result<PendingRequest<'_, T, Void>, MgmtError> {
        require(client_id, "client id")?;

        let url = self.endpoint_url(&[CLIENTS, client_id])?;
        Ok(self.request(Method::DELETE, url))
    }

    /// Rotates a client secret and returns the updated client. Requires the
    /// `update:client_keys` scope. The new secret is not base64 encoded.
    pub fn rotate_client_secret(
        &self,
        client_id: &str,
    ) -> Result<PendingRequest<'_, T, Object<Client>>, MgmtError> {
        require(client_id, "client id")?;

        let url = self.endpoint_url(&[CLIENTS, client_id, "rotate-secret"])?;
        Ok(self.request(Method::POST, url))
    }

    // ========================================================================
    // Connections
    // ========================================================================

    /// Lists connections matching `filter`. Requires the
    /// `read:connections` scope.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let filter = ConnectionFilter::new()
    ///     .with_strategy("auth0")
    ///     .with_fields("name,id", true);
    /// let connections = api.list_connections(&filter)?.execute().await?;
    /// ```
    pub fn list_connections(
        &self,
        filter: &ConnectionFilter,
    ) -> Result<PendingRequest<'_, T, List<Connection>>, MgmtError> {
        let url = self.endpoint_url(&[CONNECTIONS])?;
        Ok(filter.apply(self.request(Method::GET, url)))
    }

    /// Gets a single connection. Requires the `read:connections` scope.
    pub fn get_connection(
        &self,
        connection_id: &str,
        fields: &FieldsFilter,
    ) -> Result<PendingRequest<'_, T, Object<Connection>>, MgmtError> {
        require(connection_id, "connection id")?;

        let url = self.endpoint_url(&[CONNECTIONS, connection_id])?;
        Ok(fields.apply(self.request(Method::GET, url)))
    }

    /// Creates a connection. Requires the `create:connections` scope.
    pub fn create_connection(
        &self,
        connection: &Connection,
    ) -> Result<PendingRequest<'_, T, Object<Connection>, JsonBody>, MgmtError> {
        let url = self.endpoint_url(&[CONNECTIONS])?;
        self.request(Method::POST, url).set_body(&connection.payload()?)
    }

    /// Updates a connection. Requires the `update:connections` scope.
    ///
    /// If `options` is set it replaces all existing options.
    pub fn update_connection(
        &self,
        connection_id: &str,
        connection: &Connection,
    ) -> Result<PendingRequest<'_, T, Object<Connection>, JsonBody>, MgmtError> {
        require(connection_id, "connection id")?;

        let url = self.endpoint_url(&[CONNECTIONS, connection_id])?;
        self.request(Method::PATCH, url).set_body(&connection.payload()?)
    }

    /// Deletes a connection. Requires the `delete:connections` scope.
    pub fn delete_connection(
        &self,
        connection_id: &str,
    ) -> Result<PendingRequest<'_, T, Void>, MgmtError> {
        require(connection_id, "connection id")?;

        let url = self.endpoint_url(&[CONNECTIONS, connection_id])?;
        Ok(self.request(Method::DELETE, url))
    }

    /// Deletes a user from a database connection by email. Requires the
    /// `delete:users` scope.
    pub fn delete_connection_user(
        &self,
        connection_id: &str,
        email: &str,
    ) -> Result<PendingRequest<'_, T, Void, FieldBody>, MgmtError> {
        require(connection_id, "connection id")?;
        require(email, "email")?;

        let url = self.endpoint_url(&[CONNECTIONS, connection_id, "users"])?;
        self.request(Method::DELETE, url)
            .add_parameter("email", email)
    }
}

impl<T> fmt::Debug for MgmtApi<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MgmtApi")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Fails with `InvalidArgument` if a required value is empty or blank.
fn require(value: &str, name: &str) -> Result<(), MgmtError> {
    if value.trim().is_empty() {
        return Err(MgmtError::missing_argument(name));
    }
    Ok(())
}

fn scope_list<S: AsRef<str>>(scope: &[S]) -> Vec<&str> {
    scope.iter().map(AsRef::as_ref).collect()
}

/// Field selection for connection reads.
///
/// `include_fields` is only sent together with `fields`; without a field
/// list it is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldsFilter {
    fields: Option<String>,
    include_fields: bool,
}

impl Default for FieldsFilter {
    fn default() -> Self {
        Self {
            fields: None,
            include_fields: true,
        }
    }
}

impl FieldsFilter {
    /// Returns every field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a comma separated field list; `include` chooses whether the
    /// list is included or excluded.
    pub fn with_fields(mut self, fields: impl Into<String>, include: bool) -> Self {
        self.fields = Some(fields.into());
        self.include_fields = include;
        self
    }

    fn apply<'a, T, S>(&self, request: PendingRequest<'a, T, S>) -> PendingRequest<'a, T, S> {
        match &self.fields {
            Some(fields) => request
                .add_query_parameter("fields", fields)
                .add_query_parameter("include_fields", bool_str(self.include_fields)),
            None => request,
        }
    }
}

/// Filters for listing connections.
///
/// Use the builder methods to set only what's needed; unset filters are
/// omitted from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionFilter {
    strategy: Option<String>,
    name: Option<String>,
    fields: FieldsFilter,
}

impl ConnectionFilter {
    /// Creates an empty filter (all connections, all fields).
    pub fn new() -> Self {
        Self::default()
    }

    /// Only returns connections using this strategy (e.g. "auth0").
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Only returns the connection with this name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Selects a comma separated field list to include or exclude.
    pub fn with_fields(mut self, fields: impl Into<String>, include: bool) -> Self {
        self.fields = self.fields.with_fields(fields, include);
        self
    }

    /// Replaces the field selection with `fields`.
    pub fn with_fields_filter(mut self, fields: FieldsFilter) -> Self {
        self.fields = fields;
        self
    }

    fn apply<'a, T, S>(&self, mut request: PendingRequest<'a, T, S>) -> PendingRequest<'a, T, S> {
        if let Some(strategy) = &self.strategy {
            request = request.add_query_parameter("strategy", strategy);
        }
        if let Some(name) = &self.name {
            request = request.add_query_parameter("name", name);
        }
        self.fields.apply(request)
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
