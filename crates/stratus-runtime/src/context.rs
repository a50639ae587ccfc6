//! Per-call execution state shared across pipeline handlers.

use std::any::Any;

use uuid::Uuid;

use stratus_auth::Credentials;
use stratus_model::{MarshalError, Operation, UnmarshalError, WireRequest, WireResponse};
use stratus_transport::CancelToken;

use crate::metrics::Metrics;

/// Per-call options supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Treat a 404 whose body unmarshals as a success as a successful
    /// (possibly empty) response instead of a not-found fault.
    pub suppress_not_found: bool,
    /// Deliver the completion callback through the main-thread dispatcher
    /// instead of firing it on the worker. Only meaningful for
    /// callback-style invocation on a client with a dispatcher configured.
    pub execute_callback_on_main_thread: bool,
    /// Cancellation token honored at the transport boundary.
    pub cancel: CancelToken,
}

/// How a pipeline run completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The call completed normally.
    Completed,
    /// A 404 was downgraded to a successful (possibly empty) response at the
    /// caller's request.
    SuppressedNotFound,
}

/// Type-erased output of an operation, downcast by the client at completion.
pub(crate) type ErasedOutput = Box<dyn Any + Send>;

/// The marshalling capability of one operation, erased so the pipeline never
/// depends on the typed request or response.
pub(crate) struct OperationCodec {
    pub marshall: Box<dyn Fn(&dyn Any) -> Result<WireRequest, MarshalError> + Send + Sync>,
    pub unmarshall: Box<dyn Fn(&WireResponse) -> Result<ErasedOutput, UnmarshalError> + Send + Sync>,
}

impl OperationCodec {
    /// Erase the typed conversions of `O`.
    pub(crate) fn erase<O: Operation>() -> Self {
        Self {
            marshall: Box::new(|input| {
                let input = input
                    .downcast_ref::<O::Input>()
                    .ok_or_else(|| MarshalError::Invalid("input type mismatch".to_owned()))?;
                O::marshall(input)
            }),
            unmarshall: Box::new(|response| {
                let output = O::unmarshall(response)?;
                Ok(Box::new(output) as ErasedOutput)
            }),
        }
    }
}

impl std::fmt::Debug for OperationCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationCodec").finish_non_exhaustive()
    }
}

/// Mutable state owned by exactly one in-flight call.
///
/// Handlers keep no per-call state of their own; everything a call needs
/// lives here and is dropped when the call completes.
pub(crate) struct ExecutionContext {
    pub invocation_id: Uuid,
    pub operation: &'static str,
    pub options: CallOptions,
    pub input: Option<Box<dyn Any + Send>>,
    pub codec: OperationCodec,
    pub request: Option<WireRequest>,
    pub response: Option<WireResponse>,
    pub output: Option<ErasedOutput>,
    pub credentials: Option<Credentials>,
    pub metrics: Metrics,
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("invocation_id", &self.invocation_id)
            .field("operation", &self.operation)
            .field("request", &self.request)
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

impl ExecutionContext {
    /// Create the context for one invocation of `O`.
    pub(crate) fn new<O: Operation>(input: O::Input, options: CallOptions) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            operation: O::NAME,
            options,
            input: Some(Box::new(input)),
            codec: OperationCodec::erase::<O>(),
            request: None,
            response: None,
            output: None,
            credentials: None,
            metrics: Metrics::default(),
        }
    }
}
