//! The typed error taxonomy for pipeline execution.
//!
//! Every fault a call can produce lands in exactly one [`SdkError`] category,
//! so callers can distinguish "the network failed" from "the service
//! complained" from "we could not understand a nominally successful
//! response". Service faults are further classified by error code through the
//! [`ErrorCodeRegistry`].

use std::collections::HashMap;

use http::StatusCode;

use stratus_auth::AuthError;
use stratus_model::{ErrorDetails, FaultKind, MarshalError, UnmarshalError};
use stratus_transport::TransportError;

/// Any fault raised during pipeline execution.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// No HTTP response was obtained (connect/DNS/timeout/body-read failure).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service returned an error status, classified by error code.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The response could not be parsed into the expected shape — distinct
    /// from a service fault so callers can tell "the service complained"
    /// apart from "we could not understand the response".
    #[error("failed to unmarshal response: {source}")]
    Unmarshal {
        /// The underlying parse failure.
        #[source]
        source: UnmarshalError,
    },

    /// Valid credentials could not be obtained.
    #[error(transparent)]
    Credentials(#[from] AuthError),

    /// The typed request could not be converted to wire bytes.
    #[error(transparent)]
    Marshal(#[from] MarshalError),

    /// The call was cancelled before completion.
    #[error("call was cancelled")]
    Cancelled,

    /// The completion callback could not be delivered.
    #[error("completion could not be dispatched: {0}")]
    Dispatch(String),

    /// A pipeline invariant was violated; indicates a bug, not a caller error.
    #[error("internal pipeline error: {0}")]
    Internal(String),
}

/// A service-reported fault: error status plus a (possibly synthesized)
/// error body, mapped to the most specific known [`ServiceErrorKind`].
#[derive(Debug, thiserror::Error)]
#[error("{code}: {message} (status {status})")]
pub struct ServiceError {
    code: String,
    message: String,
    request_id: Option<String>,
    status: StatusCode,
    kind: ServiceErrorKind,
    fault: FaultKind,
}

impl ServiceError {
    /// Short error code reported by the service.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable message from the service.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Service-assigned request id, for support diagnostics.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// HTTP status of the error response.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Classified error kind ([`ServiceErrorKind::Unmodeled`] when the code
    /// was not registered).
    #[must_use]
    pub fn kind(&self) -> ServiceErrorKind {
        self.kind
    }

    /// Which side the service blamed, when reported.
    #[must_use]
    pub fn fault(&self) -> FaultKind {
        self.fault
    }
}

/// Known service error classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ServiceErrorKind {
    /// The named resource does not exist.
    NotFound,
    /// A request parameter failed validation.
    InvalidParameter,
    /// The caller is being throttled.
    Throttled,
    /// The caller is not allowed to perform the operation.
    AccessDenied,
    /// A conditional write or precondition failed.
    ConditionFailed,
    /// The service is temporarily unavailable.
    ServiceUnavailable,
    /// The service reported an internal failure.
    Internal,
    /// The error code was not recognized; generic fallback.
    #[default]
    Unmodeled,
}

/// Per-service lookup table mapping error codes to typed kinds.
///
/// Lookup is an exact string match on the (namespace-stripped) error code;
/// unrecognized codes classify as [`ServiceErrorKind::Unmodeled`].
#[derive(Debug, Clone, Default)]
pub struct ErrorCodeRegistry {
    kinds: HashMap<&'static str, ServiceErrorKind>,
}

impl ErrorCodeRegistry {
    /// Empty registry: every code classifies as unmodeled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the provider's common error codes.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry
            .register("ResourceNotFoundException", ServiceErrorKind::NotFound)
            .register("NoSuchKey", ServiceErrorKind::NotFound)
            .register("NotFound", ServiceErrorKind::NotFound)
            .register("ValidationException", ServiceErrorKind::InvalidParameter)
            .register("InvalidParameter", ServiceErrorKind::InvalidParameter)
            .register("InvalidParameterValue", ServiceErrorKind::InvalidParameter)
            .register("ThrottlingException", ServiceErrorKind::Throttled)
            .register("Throttling", ServiceErrorKind::Throttled)
            .register("AccessDeniedException", ServiceErrorKind::AccessDenied)
            .register("AccessDenied", ServiceErrorKind::AccessDenied)
            .register(
                "ConditionalCheckFailedException",
                ServiceErrorKind::ConditionFailed,
            )
            .register("ServiceUnavailable", ServiceErrorKind::ServiceUnavailable)
            .register("InternalServerError", ServiceErrorKind::Internal)
            .register("InternalFailure", ServiceErrorKind::Internal);
        registry
    }

    /// Register a code → kind mapping. Later registrations overwrite earlier
    /// ones for the same code.
    pub fn register(&mut self, code: &'static str, kind: ServiceErrorKind) -> &mut Self {
        self.kinds.insert(code, kind);
        self
    }

    /// Map parsed error details to a typed [`ServiceError`].
    #[must_use]
    pub fn classify(&self, details: &ErrorDetails, status: StatusCode) -> ServiceError {
        let kind = self
            .kinds
            .get(details.code.as_str())
            .copied()
            .unwrap_or_default();
        ServiceError {
            code: details.code.clone(),
            message: details.message.clone(),
            request_id: details.request_id.clone(),
            status,
            kind,
            fault: details.fault,
        }
    }
}
