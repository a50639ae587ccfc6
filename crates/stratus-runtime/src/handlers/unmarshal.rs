//! Success-response unmarshalling.

use async_trait::async_trait;

use crate::context::{Disposition, ExecutionContext};
use crate::error::SdkError;
use crate::metrics::Metric;
use crate::pipeline::{Next, PipelineHandler};

/// Converts success bodies into the typed output through the operation
/// codec. Error statuses are left untouched for the classifier above; a
/// success status with an unintelligible body is an unmarshal fault, which is
/// a distinct category from a service fault.
#[derive(Debug, Default)]
pub(crate) struct UnmarshalHandler;

#[async_trait]
impl PipelineHandler for UnmarshalHandler {
    async fn handle(
        &self,
        ctx: &mut ExecutionContext,
        next: Next<'_>,
    ) -> Result<Disposition, SdkError> {
        let disposition = next.run(ctx).await?;

        let Some(response) = ctx.response.clone() else {
            return Ok(disposition);
        };
        if !response.status().is_success() {
            return Ok(disposition);
        }

        ctx.metrics.start_timer(Metric::UnmarshallTime);
        let result = (ctx.codec.unmarshall)(&response);
        ctx.metrics.stop_timer(Metric::UnmarshallTime);

        ctx.output = Some(result.map_err(|source| SdkError::Unmarshal { source })?);
        Ok(disposition)
    }
}
