//! Canned-response transport for tests and offline use.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use stratus_model::{WireRequest, WireResponse};

use crate::cancel::CancelToken;
use crate::error::TransportError;
use crate::HttpTransport;

/// Transport that replays a scripted sequence of responses.
///
/// Each `send` consumes the next scripted result and records the request it
/// was given, so tests can assert on exactly what reached the wire. Suitable
/// for tests and development; the counterpart of a real socket transport the
/// way a static credential provider is the counterpart of a federated one.
#[derive(Debug, Default)]
pub struct StaticTransport {
    script: Mutex<VecDeque<Result<WireResponse, TransportError>>>,
    seen: Mutex<Vec<WireRequest>>,
}

impl StaticTransport {
    /// Create a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn respond_with(&self, response: WireResponse) {
        self.script.lock().push_back(Ok(response));
    }

    /// Queue a transport failure.
    pub fn fail_with(&self, error: TransportError) {
        self.script.lock().push_back(Err(error));
    }

    /// Requests sent so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<WireRequest> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for StaticTransport {
    async fn send(
        &self,
        request: &WireRequest,
        cancel: &CancelToken,
    ) -> Result<WireResponse, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        self.seen.lock().push(request.clone());
        self.script.lock().pop_front().unwrap_or_else(|| {
            Err(TransportError::Connect(
                "no scripted response remaining".to_owned(),
            ))
        })
    }
}
