//! In-memory transport for unit tests.

use std::sync::Mutex;

use reqwest::StatusCode;

use crate::error::TransportError;
use crate::transport::{HttpRequest, HttpResponse, Transport};

type FailFn = Box<dyn Fn() -> TransportError + Send + Sync>;

enum Outcome {
    Respond(HttpResponse),
    Fail(FailFn),
}

/// Records every request it is given and answers with a canned outcome.
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    outcome: Outcome,
}

impl RecordingTransport {
    pub(crate) fn ok(body: &'static str) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    pub(crate) fn with_status(status: StatusCode, body: &'static str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            outcome: Outcome::Respond(HttpResponse::new(status, body)),
        }
    }

    pub(crate) fn failing(fail: impl Fn() -> TransportError + Send + Sync + 'static) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            outcome: Outcome::Fail(Box::new(fail)),
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        match &self.outcome {
            Outcome::Respond(response) => Ok(response.clone()),
            Outcome::Fail(fail) => Err(fail()),
        }
    }
}
