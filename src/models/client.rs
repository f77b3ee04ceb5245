//! Client (application) models.
//!
//! A client is an application registered with the tenant. The same type is
//! used for responses and for create/update payloads: unset fields are
//! omitted from the serialized body so a PATCH only touches what was set.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An application registered with the tenant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Unique client ID, assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Display name of the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Client secret. Only returned with the `read:client_keys` scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Application type: "native", "spa", "regular_web" or "non_interactive".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,

    /// URL of the logo shown on the login page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,

    /// Whether this is a first party client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_first_party: Option<bool>,

    /// Whether the client follows the OIDC conformant flows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oidc_conformant: Option<bool>,

    /// Allowed callback URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<Vec<String>>,

    /// Allowed origins for cross origin authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,

    /// Allowed web origins for CORS and web message response mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_origins: Option<Vec<String>>,

    /// Grant types the client may use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_types: Option<Vec<String>>,

    /// Audiences for WS-Fed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_aliases: Option<Vec<String>>,

    /// Clients allowed to request delegation tokens for this client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_clients: Option<Vec<String>>,

    /// URLs that are valid to redirect to after logout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_logout_urls: Option<Vec<String>>,

    /// Settings of the ID tokens issued for this client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_configuration: Option<JwtConfiguration>,

    /// Encryption used for WS-Fed responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<EncryptionKey>,

    /// Whether the client uses the tenant's single sign on session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sso: Option<bool>,

    /// Disables single sign on for this client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sso_disabled: Option<bool>,

    /// Whether cross origin authentication is allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_origin_auth: Option<bool>,

    /// URL of the cross origin verification page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_origin_loc: Option<String>,

    /// Whether a custom login page is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_login_page_on: Option<bool>,

    /// The custom login page HTML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_login_page: Option<String>,

    /// The custom login page preview HTML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_login_page_preview: Option<String>,

    /// HTML form template for WS-Fed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_template: Option<String>,

    /// Add-on settings keyed by add-on name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addons: Option<Map<String, Value>>,

    /// Authentication method for the token endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_endpoint_auth_method: Option<String>,

    /// Arbitrary string metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_metadata: Option<Map<String, Value>>,

    /// Native mobile settings (Android/iOS).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<Value>,
}

impl Client {
    /// Creates a client payload with only a name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the application type.
    pub fn with_app_type(mut self, app_type: impl Into<String>) -> Self {
        self.app_type = Some(app_type.into());
        self
    }

    /// Sets the allowed callback URLs.
    pub fn with_callbacks<I, S>(mut self, callbacks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.callbacks = Some(callbacks.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the allowed grant types.
    pub fn with_grant_types<I, S>(mut self, grant_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grant_types = Some(grant_types.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the display name, falling back to the client ID.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.client_id.as_deref())
            .unwrap_or("(unnamed client)")
    }
}

/// ID token settings for a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JwtConfiguration {
    /// Token lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime_in_seconds: Option<u32>,

    /// Whether the client secret is base64 encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_encoded: Option<bool>,

    /// Scope restrictions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Value>,

    /// Signing algorithm (e.g. "RS256").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
}

/// WS-Fed encryption key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncryptionKey {
    /// Public key in PEM format.
    #[serde(default, rename = "pub", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    /// Certificate in PEM format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,

    /// Certificate subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_deserialize() {
        let json = r#"{
            "client_id": "abc123",
            "name": "My App",
            "app_type": "spa",
            "callbacks": ["https://app.example.com/callback"],
            "jwt_configuration": {"lifetime_in_seconds": 36000, "alg": "RS256"},
            "encryption_key": {"pub": "-----BEGIN PUBLIC KEY-----"},
            "unknown_field": 1
        }"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.client_id.as_deref(), Some("abc123"));
        assert_eq!(client.display_name(), "My App");
        assert_eq!(client.app_type.as_deref(), Some("spa"));
        let jwt = client.jwt_configuration.unwrap();
        assert_eq!(jwt.lifetime_in_seconds, Some(36000));
        assert_eq!(
            client.encryption_key.unwrap().public_key.as_deref(),
            Some("-----BEGIN PUBLIC KEY-----")
        );
    }

    #[test]
    fn test_client_serialize_omits_unset_fields() {
        let client = Client::new("My App").with_app_type("regular_web");
        let value = serde_json::to_value(&client).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "My App", "app_type": "regular_web"})
        );
    }

    #[test]
    fn test_client_id_serialized_when_known() {
        let client = Client {
            client_id: Some("abc123".to_string()),
            description: Some("updated".to_string()),
            ..Client::default()
        };
        let value = serde_json::to_value(&client).unwrap();
        assert_eq!(value["client_id"], "abc123");
        assert_eq!(value["description"], "updated");
    }

    #[test]
    fn test_display_name_fallback() {
        let client = Client {
            client_id: Some("abc123".to_string()),
            ..Client::default()
        };
        assert_eq!(client.display_name(), "abc123");
        assert_eq!(Client::default().display_name(), "(unnamed client)");
    }
}
