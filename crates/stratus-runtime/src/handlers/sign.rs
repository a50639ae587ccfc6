//! Request signing.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use stratus_auth::SignRequest;

use crate::context::{Disposition, ExecutionContext};
use crate::error::SdkError;
use crate::metrics::Metric;
use crate::pipeline::{Next, PipelineHandler};

/// Signs the wire request in place. Positioned after marshalling so the
/// signature covers the final body and headers, and after credential
/// resolution so it never signs with expired keys.
pub(crate) struct SignHandler {
    signer: Arc<dyn SignRequest>,
}

impl SignHandler {
    pub(crate) fn new(signer: Arc<dyn SignRequest>) -> Self {
        Self { signer }
    }
}

#[async_trait]
impl PipelineHandler for SignHandler {
    async fn handle(
        &self,
        ctx: &mut ExecutionContext,
        next: Next<'_>,
    ) -> Result<Disposition, SdkError> {
        let credentials = ctx
            .credentials
            .clone()
            .ok_or_else(|| SdkError::Internal("signing before credential resolution".to_owned()))?;
        ctx.metrics.start_timer(Metric::RequestSigningTime);
        let request = ctx
            .request
            .as_mut()
            .ok_or_else(|| SdkError::Internal("signing before marshal".to_owned()))?;
        let result = self.signer.sign(request, &credentials, Utc::now());
        ctx.metrics.stop_timer(Metric::RequestSigningTime);
        result?;

        next.run(ctx).await
    }
}
