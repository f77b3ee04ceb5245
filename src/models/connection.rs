//! Connection models.
//!
//! A connection is an identity source (database, social provider,
//! enterprise directory) that users authenticate against.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An identity source configured on the tenant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID, assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Connection name. Cannot be changed after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Identity provider strategy (e.g. "auth0", "google-oauth2", "samlp").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Name shown on the login page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Strategy specific options. When present in an update, replaces all
    /// existing options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,

    /// IDs of the clients for which the connection is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_clients: Option<Vec<String>>,

    /// Realms the connection is used for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realms: Option<Vec<String>>,

    /// Whether the connection is a domain level connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_domain_connection: Option<bool>,

    /// Arbitrary string metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Connection {
    /// Creates a connection payload with a name and strategy.
    pub fn new(name: impl Into<String>, strategy: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            strategy: Some(strategy.into()),
            ..Self::default()
        }
    }

    /// Sets a single strategy option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets the clients the connection is enabled for.
    pub fn with_enabled_clients<I, S>(mut self, clients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_clients = Some(clients.into_iter().map(Into::into).collect());
        self
    }
}
