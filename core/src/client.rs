//! Stateless HTTP request builder and response parser for the GreenTrade API.
//!
//! # Design
//! `GreenTradeClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The host executes the HTTP round-trip (and any retries)
//! in between, keeping this layer deterministic and free of I/O.
//!
//! Write operations validate their payload in `build_*`, so an invalid
//! form never reaches the network.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{AnalyticsSummary, NewProduct, NewSupplier, Product, ProductFilter, ProductUpdate, Supplier};

const JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct GreenTradeClient {
    base_url: String,
}

impl GreenTradeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_fetch_analytics_summary(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/analytics/summary".to_string(), None)
    }

    pub fn build_list_suppliers(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/suppliers/".to_string(), None)
    }

    pub fn build_get_supplier(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/suppliers/{id}"), None)
    }

    pub fn build_create_supplier(&self, input: &NewSupplier) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        let body = encode(input)?;
        Ok(self.request(HttpMethod::Post, "/suppliers/".to_string(), Some(body)))
    }

    pub fn build_list_products(&self, filter: &ProductFilter) -> HttpRequest {
        let pairs = filter.query_pairs();
        let path = if pairs.is_empty() {
            "/products/".to_string()
        } else {
            let query: Vec<String> = pairs
                .iter()
                .map(|(key, value)| format!("{key}={}", encode_query_value(value)))
                .collect();
            format!("/products/?{}", query.join("&"))
        };
        self.request(HttpMethod::Get, path, None)
    }

    pub fn build_create_product(&self, input: &NewProduct) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        let body = encode(input)?;
        Ok(self.request(HttpMethod::Post, "/products/".to_string(), Some(body)))
    }

    pub fn build_update_product(&self, id: i64, input: &ProductUpdate) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        let mut body = serde_json::to_value(input).map_err(|e| ApiError::Encode(e.to_string()))?;
        if input.clears_expiry() {
            if let Some(fields) = body.as_object_mut() {
                fields.insert("certification_expiry_date".to_string(), serde_json::Value::Null);
            }
        }
        Ok(self.request(HttpMethod::Put, format!("/products/{id}"), Some(body.to_string())))
    }

    pub fn build_delete_product(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/products/{id}"), None)
    }

    pub fn parse_fetch_analytics_summary(&self, response: HttpResponse) -> Result<AnalyticsSummary, ApiError> {
        require_body(decode_response(&response)?)
    }

    pub fn parse_list_suppliers(&self, response: HttpResponse) -> Result<Vec<Supplier>, ApiError> {
        require_body(decode_response(&response)?)
    }

    pub fn parse_get_supplier(&self, response: HttpResponse) -> Result<Supplier, ApiError> {
        require_body(decode_response(&response)?)
    }

    pub fn parse_create_supplier(&self, response: HttpResponse) -> Result<Supplier, ApiError> {
        require_body(decode_response(&response)?)
    }

    pub fn parse_list_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        require_body(decode_response(&response)?)
    }

    pub fn parse_create_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        require_body(decode_response(&response)?)
    }

    pub fn parse_update_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        require_body(decode_response(&response)?)
    }

    /// The backend acknowledges with 204; any body it might send is ignored.
    pub fn parse_delete_product(&self, response: HttpResponse) -> Result<(), ApiError> {
        if !response.is_success() {
            return Err(ApiError::from_response(&response));
        }
        Ok(())
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers: vec![
                ("content-type".to_string(), JSON.to_string()),
                ("accept".to_string(), JSON.to_string()),
            ],
            body,
        }
    }
}

/// Decodes a response: non-2xx becomes a normalized `ApiError`, no content
/// becomes `None`, anything else must deserialize into `T`.
pub fn decode_response<T: DeserializeOwned>(response: &HttpResponse) -> Result<Option<T>, ApiError> {
    if !response.is_success() {
        return Err(ApiError::from_response(response));
    }
    if response.is_no_content() {
        return Ok(None);
    }
    serde_json::from_str(&response.body)
        .map(Some)
        .map_err(|e| ApiError::Decode(format!("unexpected response body: {e}")))
}

fn require_body<T>(decoded: Option<T>) -> Result<T, ApiError> {
    decoded.ok_or_else(|| ApiError::Decode("expected a response body, got none".to_string()))
}

fn encode<T: Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::Encode(e.to_string()))
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
