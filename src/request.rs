//! Pending requests: the request builder and typed executor.
//!
//! A [`PendingRequest`] accumulates everything needed for one HTTP call and
//! is consumed by [`execute`](PendingRequest::execute). It carries two type
//! parameters besides the transport:
//!
//! - `S: ResultShape` - what the response decodes into
//! - `B: BodyState` - how the body was built
//!
//! # Body construction
//!
//! A body is built exactly one way per request. Either the whole body is
//! set from a typed object with `set_body`, or it is accumulated field by
//! field with `add_parameter`. The body state makes the two paths mutually
//! exclusive at compile time:
//!
//! ```text
//!            set_body                 add_parameter
//! JsonBody <---------- NoBody -----------------------> FieldBody
//!                                                      |     ^
//!                                                      +-----+
//!                                                   add_parameter
//! ```
//!
//! ```compile_fail
//! # use mgmt_api::{MgmtApi, models::Client};
//! # fn demo(api: &MgmtApi) -> Result<(), mgmt_api::error::MgmtError> {
//! // A request whose body was set as a whole can't take named parameters.
//! api.create_client(&Client::new("app"))?.add_parameter("name", "other");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::error::MgmtError;
use crate::shape::ResultShape;
use crate::transport::{HttpRequest, Transport};

const CONTENT_TYPE: &str = "Content-Type";
const JSON_MIME: &str = "application/json";

mod sealed {
    pub trait Sealed {}
}

/// How the body of a [`PendingRequest`] was built. Sealed.
pub trait BodyState: sealed::Sealed {
    /// The JSON payload that will be sent, if any.
    fn json(&self) -> Option<Value>;
}

/// No body has been set.
#[derive(Debug, Clone, Default)]
pub struct NoBody;

/// The whole body was set from a typed object.
#[derive(Debug, Clone)]
pub struct JsonBody(Value);

/// The body is a JSON object accumulated from named parameters.
#[derive(Debug, Clone, Default)]
pub struct FieldBody(Map<String, Value>);

impl sealed::Sealed for NoBody {}
impl sealed::Sealed for JsonBody {}
impl sealed::Sealed for FieldBody {}

impl BodyState for NoBody {
    fn json(&self) -> Option<Value> {
        None
    }
}

impl BodyState for JsonBody {
    fn json(&self) -> Option<Value> {
        Some(self.0.clone())
    }
}

impl BodyState for FieldBody {
    fn json(&self) -> Option<Value> {
        Some(Value::Object(self.0.clone()))
    }
}

/// A single HTTP call that has been built but not yet sent.
pub struct PendingRequest<'a, T, S, B = NoBody> {
    transport: &'a T,
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    body: B,
    shape: PhantomData<fn() -> S>,
}

impl<'a, T, S, B: fmt::Debug> fmt::Debug for PendingRequest<'a, T, S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &crate::transport::redacted_headers(&self.headers))
            .field("body", &self.body)
            .finish()
    }
}

impl<'a, T, S> PendingRequest<'a, T, S, NoBody> {
    /// Creates a request with no headers and no body.
    pub fn new(transport: &'a T, method: Method, url: Url) -> Self {
        Self {
            transport,
            method,
            url,
            headers: Vec::new(),
            body: NoBody,
            shape: PhantomData,
        }
    }

    /// Sets the whole body by serializing a typed object to JSON.
    ///
    /// # Errors
    ///
    /// Returns `MgmtError::InvalidArgument` if the value can't be serialized.
    pub fn set_body<P>(self, body: &P) -> Result<PendingRequest<'a, T, S, JsonBody>, MgmtError>
    where
        P: Serialize + ?Sized,
    {
        let value = serde_json::to_value(body)
            .map_err(|e| MgmtError::invalid_argument(format!("body is not serializable: {}", e)))?;
        Ok(self.with_body(JsonBody(value)))
    }

    /// Adds a named field to a JSON object body, starting a field body.
    ///
    /// # Errors
    ///
    /// Returns `MgmtError::InvalidArgument` if the name is empty or the
    /// value can't be serialized.
    pub fn add_parameter<V>(
        self,
        name: impl Into<String>,
        value: V,
    ) -> Result<PendingRequest<'a, T, S, FieldBody>, MgmtError>
    where
        V: Serialize,
    {
        self.with_body(FieldBody::default())
            .add_parameter(name, value)
    }
}

impl<'a, T, S> PendingRequest<'a, T, S, FieldBody> {
    /// Adds another named field to the body. A repeated name overwrites.
    ///
    /// # Errors
    ///
    /// Returns `MgmtError::InvalidArgument` if the name is empty or the
    /// value can't be serialized.
    pub fn add_parameter<V>(mut self, name: impl Into<String>, value: V) -> Result<Self, MgmtError>
    where
        V: Serialize,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(MgmtError::missing_argument("parameter name"));
        }
        let value = serde_json::to_value(value).map_err(|e| {
            MgmtError::invalid_argument(format!("parameter '{}' is not serializable: {}", name, e))
        })?;
        self.body.0.insert(name, value);
        Ok(self)
    }
}

impl<'a, T, S, B> PendingRequest<'a, T, S, B> {
    /// Adds a header, overwriting (in place) any header with the same name.
    ///
    /// Names compare case-insensitively. Values are not validated here;
    /// a malformed header fails at execution time.
    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    /// Appends a query parameter to the URL.
    pub fn add_query_parameter(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The absolute URL, query string included.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn with_body<B2>(self, body: B2) -> PendingRequest<'a, T, S, B2> {
        PendingRequest {
            transport: self.transport,
            method: self.method,
            url: self.url,
            headers: self.headers,
            body,
            shape: PhantomData,
        }
    }
}

impl<'a, T, S, B: BodyState> PendingRequest<'a, T, S, B> {
    /// The JSON body that will be sent, if any.
    pub fn body_json(&self) -> Option<Value> {
        self.body.json()
    }

    /// Converts into the plain request handed to the transport.
    ///
    /// POST, PUT and PATCH without a body send an empty payload; GET and
    /// DELETE without a body send none.
    pub fn to_http_request(&self) -> Result<HttpRequest, MgmtError> {
        let mut headers = self.headers.clone();
        let body = match self.body.json() {
            Some(value) => {
                let bytes = serde_json::to_vec(&value).map_err(|e| {
                    MgmtError::invalid_argument(format!("body is not serializable: {}", e))
                })?;
                if !headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(CONTENT_TYPE)) {
                    headers.push((CONTENT_TYPE.to_string(), JSON_MIME.to_string()));
                }
                Some(Bytes::from(bytes))
            }
            None if matches!(self.method, Method::POST | Method::PUT | Method::PATCH) => {
                Some(Bytes::new())
            }
            None => None,
        };

        Ok(HttpRequest {
            method: self.method.clone(),
            url: self.url.to_string(),
            headers,
            body,
        })
    }
}

impl<'a, T, S, B> PendingRequest<'a, T, S, B>
where
    T: Transport,
    S: ResultShape,
    B: BodyState,
{
    /// Sends the request and decodes the response.
    ///
    /// # Errors
    ///
    /// - `MgmtError::RequestExecution` if the transport fails
    /// - `MgmtError::ApiStatus` if the server answers with a non-2xx status
    /// - `MgmtError::ResponseDecoding` if a 2xx body doesn't match `S`
    pub async fn execute(self) -> Result<S::Output, MgmtError> {
        let request = self.to_http_request()?;

        tracing::debug!(
            method = %self.method,
            path = %self.url.path(),
            "Executing management API request"
        );

        let response = self
            .transport
            .send(request)
            .await
            .map_err(MgmtError::RequestExecution)?;

        if !response.status.is_success() {
            let err = MgmtError::api_status(response.status, &response.body);
            tracing::warn!(
                method = %self.method,
                path = %self.url.path(),
                status = response.status.as_u16(),
                error_code = err.api_error_code().unwrap_or("none"),
                "Management API returned an error status"
            );
            return Err(err);
        }

        S::decode(&response.body)
    }
}
