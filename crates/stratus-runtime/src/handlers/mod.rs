//! The concrete handler set, listed outermost first.
//!
//! Construction order is the load-bearing invariant of the pipeline:
//!
//! 1. [`MetricsHandler`] — overall timer; finalizes and logs the record.
//! 2. [`HooksHandler`] — pre-execute and post-execute user hooks.
//! 3. [`MarshalHandler`] — typed input to wire request; stamps standard headers.
//! 4. [`EndpointHandler`] — base endpoint + path + query to a full URL.
//! 5. [`CredentialsHandler`] — resolves (possibly refreshing) credentials.
//! 6. [`SignHandler`] — runs after marshalling so the signature covers the
//!    final body, and after credential resolution so it uses fresh keys.
//! 7. [`ClassifyHandler`] — one funnel for service faults from below,
//!    including suppressed-404 handling.
//! 8. [`UnmarshalHandler`] — success bodies to typed output.
//! 9. [`SendHandler`] — the terminal transport stage.

mod classify;
mod credentials;
mod endpoint;
mod hooks;
mod marshal;
mod metrics;
mod send;
mod sign;
mod unmarshal;

pub(crate) use classify::ClassifyHandler;
pub(crate) use credentials::CredentialsHandler;
pub(crate) use endpoint::EndpointHandler;
pub(crate) use hooks::HooksHandler;
pub(crate) use marshal::MarshalHandler;
pub(crate) use metrics::MetricsHandler;
pub(crate) use send::SendHandler;
pub(crate) use sign::SignHandler;
pub(crate) use unmarshal::UnmarshalHandler;
