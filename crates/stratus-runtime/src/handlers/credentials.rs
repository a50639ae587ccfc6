//! Credential resolution ahead of signing.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use stratus_auth::ProvideCredentials;

use crate::context::{Disposition, ExecutionContext};
use crate::error::SdkError;
use crate::metrics::Metric;
use crate::pipeline::{Next, PipelineHandler};

/// Resolves credentials through the configured provider, which may perform a
/// refresh round trip. A resolution failure is a classified credential fault;
/// nothing is sent.
pub(crate) struct CredentialsHandler {
    provider: Arc<dyn ProvideCredentials>,
}

impl CredentialsHandler {
    pub(crate) fn new(provider: Arc<dyn ProvideCredentials>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl PipelineHandler for CredentialsHandler {
    async fn handle(
        &self,
        ctx: &mut ExecutionContext,
        next: Next<'_>,
    ) -> Result<Disposition, SdkError> {
        ctx.metrics.start_timer(Metric::CredentialsRequestTime);
        let result = self.provider.credentials().await;
        ctx.metrics.stop_timer(Metric::CredentialsRequestTime);

        let credentials = result?;
        debug!(
            operation = ctx.operation,
            access_key_id = credentials.access_key_id(),
            "credentials resolved"
        );
        ctx.credentials = Some(credentials);

        next.run(ctx).await
    }
}
