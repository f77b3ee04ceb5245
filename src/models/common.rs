//! Types shared across resource models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error body returned by the API with a non-success status.
///
/// ```json
/// {"statusCode":404,"error":"Not Found","message":"The client does not exist","errorCode":"inexistent_client"}
/// ```
///
/// Any JSON object is accepted; keys outside the usual format are kept in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// HTTP status echoed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// Short status description (e.g. "Not Found").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human-readable description of what went wrong.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// OAuth style description, sent by the token endpoints.
    #[serde(
        default,
        rename = "error_description",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_description: Option<String>,

    /// Machine-readable error code (e.g. "inexistent_client").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    /// Any other keys the server sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiErrorBody {
    /// The most descriptive message the server sent, if any.
    pub fn message_text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error_description.as_deref())
            .or(self.error.as_deref())
            .or(self.error_code.as_deref())
    }

    /// Returns the most descriptive message available.
    pub fn summary(&self) -> &str {
        self.message_text().unwrap_or("Unknown error")
    }
}
