//! The ordered handler chain.
//!
//! Handlers compose as an onion: each one does its request-phase work, calls
//! the next handler, and may post-process the result on the way back out or
//! short-circuit with a classified error. The chain is built once per client
//! and reused for every call; all per-call state lives in the
//! [`ExecutionContext`](crate::context::ExecutionContext), so concurrent
//! calls on one client are independent.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::{Disposition, ExecutionContext};
use crate::error::SdkError;

/// One middleware stage of the request/response chain.
#[async_trait]
pub(crate) trait PipelineHandler: Send + Sync {
    /// Perform this stage's work, delegating to `next` for the rest of the
    /// chain. Not calling `next` short-circuits the call.
    async fn handle(
        &self,
        ctx: &mut ExecutionContext,
        next: Next<'_>,
    ) -> Result<Disposition, SdkError>;
}

/// The remainder of the chain after the current handler.
pub(crate) struct Next<'a> {
    handlers: &'a [Arc<dyn PipelineHandler>],
}

impl Next<'_> {
    /// Run the remaining handlers front to back.
    pub(crate) async fn run(self, ctx: &mut ExecutionContext) -> Result<Disposition, SdkError> {
        match self.handlers.split_first() {
            Some((head, rest)) => head.handle(ctx, Next { handlers: rest }).await,
            // The terminal handler does not delegate; reaching the end of the
            // chain without one is a wiring bug.
            None => Err(SdkError::Internal(
                "handler chain ended without a terminal handler".to_owned(),
            )),
        }
    }
}

/// An immutable, ordered handler chain shared by every call on one client.
#[derive(Clone)]
pub(crate) struct Pipeline {
    handlers: Arc<[Arc<dyn PipelineHandler>]>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Pipeline {
    /// Freeze an ordered handler list into a reusable chain.
    pub(crate) fn new(handlers: Vec<Arc<dyn PipelineHandler>>) -> Self {
        Self {
            handlers: handlers.into(),
        }
    }

    /// Execute the full chain for one call.
    pub(crate) async fn run(&self, ctx: &mut ExecutionContext) -> Result<Disposition, SdkError> {
        Next {
            handlers: &self.handlers,
        }
        .run(ctx)
        .await
    }
}
