//! HTTP transport abstraction.
//!
//! Requests built by the endpoint catalog are handed to a [`Transport`] as
//! plain data. The default backend is [`ReqwestTransport`]; tests inject
//! their own implementation through
//! [`MgmtApi::with_transport`](crate::mgmt_api::MgmtApi::with_transport).
//!
//! Connection pooling, TLS and per-call deadlines are the transport's
//! concern. This module never retries.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};

use crate::error::{MgmtError, TransportError};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// An HTTP request to be sent by a [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: Method,
    /// The fully-qualified URL, query string included.
    pub url: String,
    /// Request headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Optional request body.
    pub body: Option<Bytes>,
}

/// An HTTP response returned by a [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body bytes.
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a response with no headers, mostly useful for fake transports.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Trait for pluggable HTTP backends.
///
/// Implementations must report failures that happen before a status line
/// is received as [`TransportError`]; any response, whatever its status,
/// is returned as `Ok`.
pub trait Transport: Send + Sync {
    /// Send an HTTP request and return the response.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).send(request)
    }
}

/// Settings for the default reqwest backend.
///
/// This replaces implicit client construction: everything the transport
/// does besides sending bytes (timeouts, body logging) is set here.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request deadline.
    pub timeout: Duration,
    /// Log request and response bodies at `trace` level.
    pub log_bodies: bool,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_bodies: false,
            user_agent: format!("mgmt-api/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    /// Sets the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables body logging.
    pub fn with_body_logging(mut self, enabled: bool) -> Self {
        self.log_bodies = enabled;
        self
    }
}

/// A [`Transport`] backed by [`reqwest`].
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
    log_bodies: bool,
}

impl ReqwestTransport {
    /// Creates a transport from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns `MgmtError::RequestExecution` if the HTTP client fails to
    /// initialize (e.g. the TLS backend is unavailable).
    pub fn new(config: &TransportConfig) -> Result<Self, MgmtError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| MgmtError::RequestExecution(TransportError::Other(Box::new(e))))?;

        Ok(Self {
            client,
            timeout: config.timeout,
            log_bodies: config.log_bodies,
        })
    }

    /// Wraps an existing [`reqwest::Client`].
    pub fn from_client(client: reqwest::Client, config: &TransportConfig) -> Self {
        Self {
            client,
            timeout: config.timeout,
            log_bodies: config.log_bodies,
        }
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else {
            TransportError::Other(Box::new(err))
        }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let headers = header_map(&request.headers)?;

        tracing::debug!(method = %request.method, url = %request.url, "Sending request");
        tracing::trace!(headers = ?redacted_headers(&request.headers), "Request headers");
        if self.log_bodies {
            if let Some(body) = &request.body {
                tracing::trace!(body = %String::from_utf8_lossy(body), "Request body");
            }
        }

        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Received response");
        if self.log_bodies {
            tracing::trace!(body = %String::from_utf8_lossy(&body), "Response body");
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Converts ordered header pairs into a [`HeaderMap`].
///
/// Error messages name the header but never include its value, which may
/// be a credential.
fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| TransportError::InvalidRequest(format!("invalid header name: {:?}", name)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| TransportError::InvalidRequest(format!("invalid value for header {}", name)))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Returns header pairs safe for logging, with credentials masked.
pub(crate) fn redacted_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            if name.eq_ignore_ascii_case("authorization") {
                (name.clone(), "[REDACTED]".to_string())
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transport_config() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(!config.log_bodies);
        assert!(config.user_agent.starts_with("mgmt-api/"));
    }

    #[test]
    fn test_transport_config_builders() {
        let config = TransportConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_body_logging(true);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.log_bodies);
    }

    #[test]
    fn test_header_map_conversion() {
        let headers = vec![
            ("Authorization".to_string(), "Bearer abc".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        let map = header_map(&headers).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("authorization").unwrap(), "Bearer abc");
    }

    #[test]
    fn test_header_map_rejects_invalid_name_without_leaking_value() {
        let headers = vec![("bad header".to_string(), "secret-token".to_string())];
        let err = header_map(&headers).unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)));
        assert!(!err.to_string().contains("secret-token"));
    }

    #[test]
    fn test_header_map_rejects_invalid_value_without_leaking_it() {
        let headers = vec![("Authorization".to_string(), "Bearer a\nb".to_string())];
        let err = header_map(&headers).unwrap_err();
        assert!(err.to_string().contains("Authorization"));
        assert!(!err.to_string().contains("Bearer"));
    }

    #[test]
    fn test_redacted_headers_masks_authorization() {
        let headers = vec![
            ("authorization".to_string(), "Bearer secret".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        let redacted = redacted_headers(&headers);
        assert_eq!(redacted[0].1, "[REDACTED]");
        assert_eq!(redacted[1].1, "application/json");
    }

    #[test]
    fn test_reqwest_transport_builds() {
        assert!(ReqwestTransport::new(&TransportConfig::default()).is_ok());
    }
}
