//! Typed input to wire request.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::context::{Disposition, ExecutionContext};
use crate::error::SdkError;
use crate::hooks::{call_contained, PipelineHooks};
use crate::metrics::Metric;
use crate::pipeline::{Next, PipelineHandler};

/// Header naming the operation a request targets.
pub(crate) const HEADER_TARGET: &str = "x-stratus-target";

/// Marshals the typed input through the operation codec and stamps the
/// standard headers every request carries.
pub(crate) struct MarshalHandler {
    user_agent: String,
    hooks: Arc<dyn PipelineHooks>,
}

impl MarshalHandler {
    pub(crate) fn new(user_agent: String, hooks: Arc<dyn PipelineHooks>) -> Self {
        Self { user_agent, hooks }
    }
}

#[async_trait]
impl PipelineHandler for MarshalHandler {
    async fn handle(
        &self,
        ctx: &mut ExecutionContext,
        next: Next<'_>,
    ) -> Result<Disposition, SdkError> {
        let input = ctx
            .input
            .take()
            .ok_or_else(|| SdkError::Internal("input consumed before marshalling".to_owned()))?;

        let mut request = (ctx.codec.marshall)(&*input)?;
        request.set_header("user-agent", &self.user_agent)?;
        request.set_header(HEADER_TARGET, ctx.operation)?;

        ctx.metrics
            .set_value(Metric::RequestSize, request.body().len() as u64);
        debug!(
            operation = ctx.operation,
            method = %request.method(),
            path = request.path(),
            body_len = request.body().len(),
            "request marshalled"
        );

        call_contained("after_marshal", || {
            self.hooks.after_marshal(ctx.operation, &request);
        });

        ctx.request = Some(request);
        next.run(ctx).await
    }
}
