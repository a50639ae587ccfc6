//! Per-call metrics collection.
//!
//! Every execution context owns one [`Metrics`] record. Handlers time their
//! phases into it, and the metrics handler emits the finalized record through
//! `tracing` when the context completes.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

/// Named metrics accumulated over one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Metric {
    /// Wall time for the entire pipeline run.
    ClientExecuteTime,
    /// Time spent resolving credentials (including refresh round trips).
    CredentialsRequestTime,
    /// Time spent computing the request signature.
    RequestSigningTime,
    /// Time spent in the HTTP transport.
    HttpRequestTime,
    /// Time spent unmarshalling the response body.
    UnmarshallTime,
    /// Serialized request body size in bytes.
    RequestSize,
    /// Response body size in bytes.
    ResponseSize,
    /// HTTP status code of the response.
    StatusCode,
}

impl Metric {
    /// Stable name used in emitted log records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClientExecuteTime => "client_execute_time",
            Self::CredentialsRequestTime => "credentials_request_time",
            Self::RequestSigningTime => "request_signing_time",
            Self::HttpRequestTime => "http_request_time",
            Self::UnmarshallTime => "unmarshall_time",
            Self::RequestSize => "request_size",
            Self::ResponseSize => "response_size",
            Self::StatusCode => "status_code",
        }
    }
}

/// Accumulated timings and values for one in-flight call.
#[derive(Debug, Default)]
pub struct Metrics {
    timings: HashMap<Metric, Duration>,
    pending: HashMap<Metric, Instant>,
    values: HashMap<Metric, u64>,
}

impl Metrics {
    /// Begin timing a phase. A second start for the same metric restarts it.
    pub fn start_timer(&mut self, metric: Metric) {
        self.pending.insert(metric, Instant::now());
    }

    /// Stop timing a phase. A stop without a matching start is ignored.
    pub fn stop_timer(&mut self, metric: Metric) {
        if let Some(started) = self.pending.remove(&metric) {
            *self.timings.entry(metric).or_default() += started.elapsed();
        }
    }

    /// Record a plain value (size, status code).
    pub fn set_value(&mut self, metric: Metric, value: u64) {
        self.values.insert(metric, value);
    }

    /// Accumulated time for a phase, if it was timed.
    #[must_use]
    pub fn timing(&self, metric: Metric) -> Option<Duration> {
        self.timings.get(&metric).copied()
    }

    /// Recorded value, if set.
    #[must_use]
    pub fn value(&self, metric: Metric) -> Option<u64> {
        self.values.get(&metric).copied()
    }

    /// Render the record as a compact `name=value` summary for logging.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.timings.len() + self.values.len());
        for (metric, duration) in &self.timings {
            let mut s = String::new();
            // Writing to a String cannot fail.
            let _ = write!(s, "{}={:.1}ms", metric.as_str(), duration.as_secs_f64() * 1000.0);
            parts.push(s);
        }
        for (metric, value) in &self.values {
            parts.push(format!("{}={value}", metric.as_str()));
        }
        parts.sort_unstable();
        parts.join(" ")
    }
}
