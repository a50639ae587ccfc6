//! Request execution pipeline and client for Stratus.
//!
//! A call moves through a fixed chain of handlers:
//!
//! ```text
//!  typed input
//!      │
//!  metrics ─ hooks ─ marshal ─ endpoint ─ credentials ─ sign
//!                                                         │
//!                               classify ─ unmarshal ─── send ──▶ HTTP
//!      │                           │
//!  typed output ◀──────────────────┘  (or a classified SdkError)
//! ```
//!
//! The chain is assembled once by [`ClientBuilder`] from explicitly injected
//! collaborators (transport, signer, credential provider, error registry,
//! hooks) and reused for every call. Per-call state lives in an execution
//! context owned by the call, so one client serves concurrent calls without
//! shared mutable state.
//!
//! Three execution modes drive the same pipeline: [`Client::invoke`] returns
//! a future, [`Client::invoke_blocking`] drives it to completion on the
//! calling thread, and [`Client::invoke_with_callback`] delivers the result
//! exactly once through a callback — on a worker, or on the host's main
//! thread via [`MainThreadDispatcher`] when requested.

mod client;
mod config;
mod context;
mod dispatch;
mod error;
mod handlers;
mod hooks;
mod metrics;
mod pipeline;
mod store;

pub use stratus_transport::CancelToken;

pub use client::{CallOutcome, Client, ClientBuilder};
pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use context::{CallOptions, Disposition};
pub use dispatch::MainThreadDispatcher;
pub use error::{ErrorCodeRegistry, SdkError, ServiceError, ServiceErrorKind};
pub use hooks::{NoopHooks, PipelineHooks};
pub use metrics::{Metric, Metrics};
pub use store::{LocalStore, MemoryStore};
