//! Error types for the Management API client.
//!
//! This module defines `MgmtError`, the unified error type returned by
//! every request builder and executor, and `TransportError`, the failure
//! type reported by [`Transport`](crate::transport::Transport)
//! implementations.
//!
//! # Security
//!
//! The bearer token must never be leaked in logs or error messages. Use
//! `sanitize_message()` when constructing messages from external sources.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::models::ApiErrorBody;

/// Failure reported by a transport before any HTTP status was received.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request did not complete within the configured deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The connection could not be established (DNS, refused, TLS).
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request could not be converted into a valid HTTP message.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Error payload returned alongside a non-success status.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiErrorPayload {
    /// The body was a JSON object.
    Structured(ApiErrorBody),
    /// The body was not a JSON object; the raw text is kept.
    Raw(String),
}

impl ApiErrorPayload {
    /// Builds a payload from a response body, preferring the structured form.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(parsed) => ApiErrorPayload::Structured(parsed),
            Err(_) => ApiErrorPayload::Raw(String::from_utf8_lossy(body).into_owned()),
        }
    }

    /// Returns the structured body, if the server sent one.
    pub fn structured(&self) -> Option<&ApiErrorBody> {
        match self {
            ApiErrorPayload::Structured(body) => Some(body),
            ApiErrorPayload::Raw(_) => None,
        }
    }
}

impl fmt::Display for ApiErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorPayload::Structured(body) => match body.message_text() {
                Some(text) => write!(f, "{}", text),
                // No message field; show what the server did send.
                None => match serde_json::to_string(body) {
                    Ok(json) => write!(f, "{}", json),
                    Err(_) => write!(f, "{}", body.summary()),
                },
            },
            ApiErrorPayload::Raw(text) if text.is_empty() => write!(f, "(empty body)"),
            ApiErrorPayload::Raw(text) => write!(f, "{}", text),
        }
    }
}

/// Unified error type for all Management API operations.
///
/// Each call either fully succeeds with a decoded result or fails with
/// exactly one of these variants. Nothing is retried.
#[derive(Error, Debug)]
pub enum MgmtError {
    /// A required argument was missing or malformed; raised before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error - missing or invalid environment variables.
    #[error("configuration error: {0}")]
    Config(String),

    /// The transport failed before a response status was received.
    #[error("request execution failed: {0}")]
    RequestExecution(#[source] TransportError),

    /// The server responded with a non-success status code.
    #[error("API returned HTTP {status}: {body}")]
    ApiStatus {
        /// The HTTP status code returned.
        status: StatusCode,
        /// The parsed error body, or the raw text when it wasn't JSON.
        body: ApiErrorPayload,
    },

    /// A success response whose body doesn't match the expected shape.
    #[error("response decoding failed: {0}")]
    ResponseDecoding(String),
}

impl MgmtError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        MgmtError::InvalidArgument(message.into())
    }

    /// Creates an invalid argument error for a required value that was empty.
    pub fn missing_argument(name: &str) -> Self {
        MgmtError::InvalidArgument(format!("'{}' cannot be null or empty", name))
    }

    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        MgmtError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        MgmtError::Config(message.into())
    }

    /// Creates an API status error from a status code and raw body.
    pub fn api_status(status: StatusCode, body: &[u8]) -> Self {
        MgmtError::ApiStatus {
            status,
            body: ApiErrorPayload::from_body(body),
        }
    }

    /// Returns the HTTP status for `ApiStatus` errors.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            MgmtError::ApiStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the server answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Returns the server's machine-readable error code (e.g. `inexistent_client`).
    #[must_use]
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            MgmtError::ApiStatus { body, .. } => {
                body.structured().and_then(|b| b.error_code.as_deref())
            }
            _ => None,
        }
    }

    /// Returns true if the transport gave up waiting for the server.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, MgmtError::RequestExecution(TransportError::Timeout(_)))
    }

    /// Sanitizes a message to remove any occurrence of the API token.
    ///
    /// The bearer token must never appear in logs, error messages, or
    /// command output.
    #[must_use]
    pub fn sanitize_message(message: &str, api_token: &str) -> String {
        if api_token.is_empty() {
            return message.to_string();
        }
        message.replace(api_token, "[REDACTED]")
    }

    /// Creates a sanitized version of this error's display message.
    #[must_use]
    pub fn sanitized_display(&self, api_token: &str) -> String {
        Self::sanitize_message(&self.to_string(), api_token)
    }
}
