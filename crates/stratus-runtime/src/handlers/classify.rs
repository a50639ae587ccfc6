//! Error classification: the single funnel for service faults.

use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use tracing::{debug, warn};

use stratus_model::ErrorDetails;

use crate::context::{Disposition, ExecutionContext};
use crate::error::{ErrorCodeRegistry, SdkError};
use crate::pipeline::{Next, PipelineHandler};

/// Turns error-status responses into typed [`ServiceError`]s.
///
/// Sits above both the unmarshal and transport stages so every fault from
/// below funnels through one classification point. Faults already classified
/// by an inner stage pass through unchanged.
///
/// [`ServiceError`]: crate::error::ServiceError
pub(crate) struct ClassifyHandler {
    registry: Arc<ErrorCodeRegistry>,
}

impl ClassifyHandler {
    pub(crate) fn new(registry: Arc<ErrorCodeRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl PipelineHandler for ClassifyHandler {
    async fn handle(
        &self,
        ctx: &mut ExecutionContext,
        next: Next<'_>,
    ) -> Result<Disposition, SdkError> {
        let disposition = next.run(ctx).await?;

        let Some(response) = ctx.response.clone() else {
            return Ok(disposition);
        };
        if response.status().is_success() {
            return Ok(disposition);
        }

        // 404 suppression: if the caller opted in and the body unmarshals as
        // a success, the fault is swallowed and the call completes.
        if response.status() == StatusCode::NOT_FOUND && ctx.options.suppress_not_found {
            if let Ok(output) = (ctx.codec.unmarshall)(&response) {
                debug!(
                    operation = ctx.operation,
                    "not-found suppressed at caller's request"
                );
                ctx.output = Some(output);
                return Ok(Disposition::SuppressedNotFound);
            }
        }

        let details = if response.body().is_empty() {
            ErrorDetails::from_headers(&response)
        } else {
            match ErrorDetails::parse(response.body()) {
                Ok(details) => details,
                Err(source) => {
                    warn!(
                        operation = ctx.operation,
                        status = response.status().as_u16(),
                        "error body did not parse as JSON or XML"
                    );
                    return Err(SdkError::Unmarshal { source });
                }
            }
        };

        let error = self.registry.classify(&details, response.status());
        debug!(
            operation = ctx.operation,
            code = error.code(),
            kind = ?error.kind(),
            status = response.status().as_u16(),
            "service fault classified"
        );
        Err(SdkError::Service(error))
    }
}
