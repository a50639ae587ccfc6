//! Terminal handler: the HTTP transport.

use std::sync::Arc;

use async_trait::async_trait;

use stratus_transport::{HttpTransport, TransportError};

use crate::context::{Disposition, ExecutionContext};
use crate::error::SdkError;
use crate::metrics::Metric;
use crate::pipeline::{Next, PipelineHandler};

/// Sends the signed request over the transport and stores the raw response.
///
/// Terminal stage; it never delegates. Cancellation surfaces here as
/// [`SdkError::Cancelled`] — a started network operation either completes or
/// is abandoned, with no handler rollback.
pub(crate) struct SendHandler {
    transport: Arc<dyn HttpTransport>,
}

impl SendHandler {
    pub(crate) fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl PipelineHandler for SendHandler {
    async fn handle(
        &self,
        ctx: &mut ExecutionContext,
        _next: Next<'_>,
    ) -> Result<Disposition, SdkError> {
        ctx.metrics.start_timer(Metric::HttpRequestTime);
        let result = {
            let request = ctx
                .request
                .as_ref()
                .ok_or_else(|| SdkError::Internal("send before marshal".to_owned()))?;
            self.transport.send(request, &ctx.options.cancel).await
        };
        ctx.metrics.stop_timer(Metric::HttpRequestTime);

        let response = result.map_err(|e| match e {
            TransportError::Cancelled => SdkError::Cancelled,
            other => SdkError::Transport(other),
        })?;

        ctx.response = Some(response);
        Ok(Disposition::Completed)
    }
}
