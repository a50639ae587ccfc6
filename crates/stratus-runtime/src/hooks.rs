//! User-supplied observation hooks around pipeline execution.
//!
//! Hooks are strictly observational: they cannot alter the request, the
//! response, or the outcome, and a panic inside a hook is contained and
//! logged rather than failing the call.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::warn;

use stratus_model::WireRequest;

/// Observation points offered to callers. All methods default to no-ops.
pub trait PipelineHooks: Send + Sync {
    /// Called before marshalling, with the operation name.
    fn before_execute(&self, _operation: &str) {}

    /// Called after the wire request has been marshalled, before it is
    /// resolved and signed.
    fn after_marshal(&self, _operation: &str, _request: &WireRequest) {}

    /// Called after the call completes, successfully or not.
    fn after_execute(&self, _operation: &str, _success: bool) {}
}

/// The default hook set: observes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl PipelineHooks for NoopHooks {}

/// Run a hook, containing any panic it raises.
pub(crate) fn call_contained(stage: &str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        warn!(stage, "hook panicked; panic contained");
    }
}
