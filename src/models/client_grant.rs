//! Client grant models.
//!
//! A client grant authorizes a client to request tokens for an API
//! (audience) with a set of scopes.

use serde::{Deserialize, Serialize};

/// A grant of API scopes to a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientGrant {
    /// Unique grant ID, assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The client this grant belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// The API identifier the grant applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,

    /// Granted scopes.
    #[serde(default)]
    pub scope: Vec<String>,
}

impl ClientGrant {
    /// Returns true if the grant includes the given scope.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope.iter().any(|s| s == scope)
    }
}
