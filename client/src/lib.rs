//! Async host for `greentrade-core`.
//!
//! # Overview
//! `greentrade-core` builds requests and parses responses without doing
//! I/O. This crate performs the I/O: [`ApiClient`] executes each request
//! through a [`Transport`] (by default a `ureq` agent on tokio's blocking
//! pool), retries transient failures per the configured `RetryPolicy`, and
//! exposes one typed async accessor per backend operation.
//!
//! # Design
//! - The client is an explicitly constructed value; there is no global
//!   instance. Build it from a `ClientConfig` or from the environment.
//! - `Transport` is the only seam. Tests swap in scripted transports to
//!   observe attempts and timing.

pub mod api;
pub mod report;
pub mod transport;

pub use api::ApiClient;
pub use report::{build_report, Report, ReportError};
pub use transport::{Transport, TransportError, UreqTransport};

/// Initializes `tracing` output filtered by `RUST_LOG`
/// (e.g. `RUST_LOG=greentrade_client=debug` to see every attempt).
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
