//! The operation contract between generated service code and the pipeline.

use crate::error::{MarshalError, UnmarshalError};
use crate::wire::{WireRequest, WireResponse};

/// One service operation: a typed input, a typed output, and the pair of
/// conversions between them and the wire.
///
/// Implementations are normally generated per service operation; the pipeline
/// consumes them as an opaque capability and never inspects the typed values
/// itself. Both conversions must be pure: marshalling the same input twice
/// must produce identical wire bytes (required for deterministic signing),
/// and unmarshalling must not retain references into the response.
pub trait Operation: Send + Sync + 'static {
    /// Typed request value supplied by the caller.
    type Input: Send + 'static;
    /// Typed response value delivered to the caller.
    type Output: Send + 'static;

    /// Operation name, used for routing headers, metrics, and logs.
    const NAME: &'static str;

    /// Convert the typed input into a wire request (method, path, query,
    /// headers, serialized body). The endpoint is resolved later by the
    /// pipeline; implementations leave it unset.
    ///
    /// # Errors
    ///
    /// Returns [`MarshalError`] if the input cannot be serialized.
    fn marshall(input: &Self::Input) -> Result<WireRequest, MarshalError>;

    /// Convert a successful wire response into the typed output.
    ///
    /// Called only for success statuses, and for `404` bodies when the caller
    /// opted into not-found suppression.
    ///
    /// # Errors
    ///
    /// Returns [`UnmarshalError`] if the body does not parse as the expected
    /// shape.
    fn unmarshall(response: &WireResponse) -> Result<Self::Output, UnmarshalError>;
}
