//! Data models for the Management API.
//!
//! This module contains the resource types exchanged with the API
//! (clients, connections, client grants) and the server's error payload.

use serde::Serialize;
use serde_json::Value;

use crate::error::MgmtError;

mod client;
mod client_grant;
mod common;
mod connection;

pub use client::*;
pub use client_grant::*;
pub use common::*;
pub use connection::*;

/// A resource with a server-assigned id.
///
/// The id is serialized so that decoded resources print completely, but it
/// is never part of a create or update body; use [`Resource::payload`] to
/// build one.
pub trait Resource: Serialize {
    /// JSON key holding the server-assigned id.
    const ID_FIELD: &'static str;

    /// The request body for this resource, without its id.
    ///
    /// # Errors
    ///
    /// Returns `MgmtError::InvalidArgument` if the value can't be serialized.
    fn payload(&self) -> Result<Value, MgmtError> {
        let mut value = serde_json::to_value(self)
            .map_err(|e| MgmtError::invalid_argument(format!("body is not serializable: {}", e)))?;
        if let Value::Object(map) = &mut value {
            map.remove(Self::ID_FIELD);
        }
        Ok(value)
    }
}

impl Resource for Client {
    const ID_FIELD: &'static str = "client_id";
}

impl Resource for Connection {
    const ID_FIELD: &'static str = "id";
}

impl Resource for ClientGrant {
    const ID_FIELD: &'static str = "id";
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decoded_ids_are_serialized() {
        let client: Client =
            serde_json::from_value(json!({"client_id": "abc123", "name": "App"})).unwrap();
        let printed = serde_json::to_string_pretty(&client).unwrap();
        assert!(printed.contains(r#""client_id": "abc123""#), "{}", printed);

        let grant: ClientGrant =
            serde_json::from_value(json!({"id": "cgr_1", "client_id": "abc"})).unwrap();
        assert_eq!(serde_json::to_value(&grant).unwrap()["id"], "cgr_1");

        let conn: Connection = serde_json::from_value(json!({"id": "con_1", "name": "db"})).unwrap();
        assert_eq!(serde_json::to_value(&conn).unwrap()["id"], "con_1");
    }

    #[test]
    fn test_payload_drops_id() {
        let client = Client {
            client_id: Some("abc123".to_string()),
            description: Some("updated".to_string()),
            ..Client::default()
        };
        assert_eq!(client.payload().unwrap(), json!({"description": "updated"}));

        let conn = Connection {
            id: Some("con_1".to_string()),
            ..Connection::new("db", "auth0")
        };
        assert_eq!(
            conn.payload().unwrap(),
            json!({"name": "db", "strategy": "auth0"})
        );

        let grant = ClientGrant {
            id: Some("cgr_1".to_string()),
            client_id: Some("abc".to_string()),
            ..ClientGrant::default()
        };
        assert_eq!(grant.payload().unwrap(), json!({"client_id": "abc", "scope": []}));
    }
}
