//! Wire-level request/response types and the operation contract for Stratus.
//!
//! This crate defines the data that flows through the request execution
//! pipeline: the mutable [`WireRequest`] built up by pipeline handlers, the
//! immutable [`WireResponse`] produced by the transport, the [`Operation`]
//! marshalling contract implemented by generated service code, and the
//! [`ErrorDetails`] intermediate parsed from service error bodies (JSON
//! primary, XML fallback).

mod error;
mod error_body;
mod operation;
mod wire;

pub use error::{MarshalError, UnmarshalError};
pub use error_body::{
    ErrorDetails, FaultKind, HEADER_ERROR_CODE, HEADER_ERROR_TYPE, HEADER_REQUEST_ID,
};
pub use operation::Operation;
pub use wire::{WireRequest, WireResponse};
