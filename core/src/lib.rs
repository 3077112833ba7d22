//! API client core for the GreenTrade supplier and product service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host executes the
//! HTTP round-trip and drives retries with [`RetryPolicy`], so everything
//! here is deterministic and testable.
//!
//! # Design
//! - `GreenTradeClient` is stateless and holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - All failures normalize into one [`ApiError`]; only transient ones are
//!   retryable.
//! - DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod analytics;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod http;
pub mod retry;
pub mod types;

pub use client::{decode_response, GreenTradeClient};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorKind, TransientCause};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use retry::{RetryDecision, RetryPolicy};
pub use types::{
    AnalyticsSummary, Category, CategoryCount, CertificationCount, CertificationStatus, NewProduct, NewSupplier,
    Product, ProductFilter, ProductUpdate, Supplier,
};
