//! Endpoint resolution: base URL + path + query.

use async_trait::async_trait;

use crate::context::{Disposition, ExecutionContext};
use crate::error::SdkError;
use crate::pipeline::{Next, PipelineHandler};

/// Resolves the marshalled request's target URL against the configured
/// base endpoint. Runs before signing; the signed bytes cover the final URL.
pub(crate) struct EndpointHandler {
    endpoint: String,
}

impl EndpointHandler {
    pub(crate) fn new(endpoint: impl Into<String>) -> Self {
        let mut endpoint = endpoint.into();
        while endpoint.ends_with('/') {
            endpoint.pop();
        }
        Self { endpoint }
    }
}

#[async_trait]
impl PipelineHandler for EndpointHandler {
    async fn handle(
        &self,
        ctx: &mut ExecutionContext,
        next: Next<'_>,
    ) -> Result<Disposition, SdkError> {
        let request = ctx
            .request
            .as_mut()
            .ok_or_else(|| SdkError::Internal("endpoint resolution before marshal".to_owned()))?;

        let mut url = format!("{}{}", self.endpoint, request.path());
        let query = request.query_string();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        request.set_endpoint(url);

        next.run(ctx).await
    }
}
