//! End-to-end tests for the Stratus request pipeline.
//!
//! Tests drive a real [`stratus_runtime::Client`] over the native transport
//! against an in-process hyper fixture server, so every handler from marshal
//! to classification runs exactly as it would in production. The sample
//! match-storage service model lives in [`model`]; the fixture server and its
//! canned routes live in [`server`].

use std::sync::Once;

use stratus_runtime::{Client, ClientConfig};

pub mod model;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A default-collaborator client pointed at the given endpoint.
#[must_use]
pub fn client_for(endpoint: &str) -> Client {
    init_tracing();

    let config = ClientConfig::builder()
        .service("matches")
        .endpoint(endpoint)
        .build();
    Client::builder(config)
        .build()
        .expect("client construction cannot fail with a running runtime")
}

/// Generate a unique match id for a test.
#[must_use]
pub fn test_match_id(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("{prefix}-{id}")
}

mod test_callbacks;
mod test_credentials;
mod test_errors;
mod test_pipeline;
