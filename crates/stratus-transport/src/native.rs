//! Native socket transport backed by reqwest.

use async_trait::async_trait;
use tracing::debug;

use stratus_model::{WireRequest, WireResponse};

use crate::cancel::CancelToken;
use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::HttpTransport;

/// HTTP transport over real sockets.
#[derive(Debug, Clone)]
pub struct NativeTransport {
    client: reqwest::Client,
    config: TransportConfig,
}

impl NativeTransport {
    /// Build a transport with the given timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidRequest`] if the underlying client
    /// cannot be constructed (e.g. no TLS backend available).
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(Self { client, config })
    }

    async fn execute(&self, request: &WireRequest) -> Result<WireResponse, TransportError> {
        let url = request.endpoint().ok_or_else(|| {
            TransportError::InvalidRequest("endpoint not resolved before send".to_owned())
        })?;

        debug!(
            operation = request.operation(),
            method = %request.method(),
            url,
            "sending request"
        );

        let response = self
            .client
            .request(request.method().clone(), url)
            .headers(request.headers().clone())
            .body(request.body().clone())
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        debug!(
            operation = request.operation(),
            status = status.as_u16(),
            content_length = body.len(),
            "received response"
        );
        Ok(WireResponse::new(status, headers, body))
    }

    fn map_send_error(&self, error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::TimedOut(self.config.read_timeout)
        } else {
            TransportError::Connect(error.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for NativeTransport {
    async fn send(
        &self,
        request: &WireRequest,
        cancel: &CancelToken,
    ) -> Result<WireResponse, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        tokio::select! {
            result = self.execute(request) => result,
            () = cancel.cancelled() => {
                debug!(operation = request.operation(), "request cancelled in flight");
                Err(TransportError::Cancelled)
            }
        }
    }
}
