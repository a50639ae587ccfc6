//! Pre- and post-execution user hooks.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::{Disposition, ExecutionContext};
use crate::error::SdkError;
use crate::hooks::{call_contained, PipelineHooks};
use crate::pipeline::{Next, PipelineHandler};

/// Fires the caller's observation hooks around the rest of the chain.
///
/// Hook panics are contained; a call never fails because a hook misbehaved.
pub(crate) struct HooksHandler {
    hooks: Arc<dyn PipelineHooks>,
}

impl HooksHandler {
    pub(crate) fn new(hooks: Arc<dyn PipelineHooks>) -> Self {
        Self { hooks }
    }
}

#[async_trait]
impl PipelineHandler for HooksHandler {
    async fn handle(
        &self,
        ctx: &mut ExecutionContext,
        next: Next<'_>,
    ) -> Result<Disposition, SdkError> {
        let operation = ctx.operation;
        call_contained("before_execute", || self.hooks.before_execute(operation));

        let result = next.run(ctx).await;

        let success = result.is_ok();
        call_contained("after_execute", || {
            self.hooks.after_execute(operation, success);
        });
        result
    }
}
