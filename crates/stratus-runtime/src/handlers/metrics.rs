//! Outermost handler: overall timing and metric emission.

use async_trait::async_trait;
use tracing::debug;

use crate::context::{Disposition, ExecutionContext};
use crate::error::SdkError;
use crate::metrics::Metric;
use crate::pipeline::{Next, PipelineHandler};

/// Times the whole pipeline run and emits the finalized metric record.
#[derive(Debug, Default)]
pub(crate) struct MetricsHandler;

#[async_trait]
impl PipelineHandler for MetricsHandler {
    async fn handle(
        &self,
        ctx: &mut ExecutionContext,
        next: Next<'_>,
    ) -> Result<Disposition, SdkError> {
        ctx.metrics.start_timer(Metric::ClientExecuteTime);
        let result = next.run(ctx).await;
        ctx.metrics.stop_timer(Metric::ClientExecuteTime);

        if let Some(response) = ctx.response.as_ref() {
            ctx.metrics
                .set_value(Metric::StatusCode, u64::from(response.status().as_u16()));
            ctx.metrics
                .set_value(Metric::ResponseSize, response.content_length());
        }

        debug!(
            invocation_id = %ctx.invocation_id,
            operation = ctx.operation,
            success = result.is_ok(),
            metrics = %ctx.metrics.summary(),
            "call completed"
        );
        result
    }
}
