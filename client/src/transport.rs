//! The I/O seam between `ApiClient` and the network.
//!
//! A `Transport` executes one `HttpRequest` and either returns whatever
//! response the server sent (any status) or a `TransportError` when no
//! response was received. Status interpretation stays in the core.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use greentrade_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, TransientCause};
use tracing::warn;

const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

/// No HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub cause: TransientCause,
    pub message: String,
}

impl TransportError {
    pub fn new(cause: TransientCause, message: impl Into<String>) -> Self {
        Self {
            cause,
            message: message.into(),
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::transient(err.cause, err.message)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking `ureq` agent driven from tokio's blocking pool.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || send(&agent, request))
            .await
            .map_err(|e| TransportError::new(TransientCause::Network, format!("transport task failed: {e}")))?
    }
}

fn send(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;

    let result = match method {
        HttpMethod::Get => with_headers(agent.get(&url), &headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(&url), &headers).call(),
        HttpMethod::Post => {
            let builder = with_headers(agent.post(&url), &headers);
            match body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
        HttpMethod::Put => {
            let builder = with_headers(agent.put(&url), &headers);
            match body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    };

    let mut response = result.map_err(into_transport_error)?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();
    let body = read_body(response.body_mut())?;
    Ok(HttpResponse { status, headers, body })
}

/// Reads the body of a response whose status is already known. Bytes that
/// are not UTF-8 are replaced, and an oversized body reads as empty, so the
/// status still decides the outcome. Only a connection that breaks off
/// mid-body is a transport failure.
fn read_body(body: &mut ureq::Body) -> Result<String, TransportError> {
    match body.with_config().limit(MAX_BODY_BYTES).read_to_vec() {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) if breaks_off(&err) => Err(into_transport_error(err)),
        Err(err) => {
            warn!(error = %err, "unreadable response body, treating as empty");
            Ok(String::new())
        }
    }
}

fn breaks_off(err: &ureq::Error) -> bool {
    match err {
        ureq::Error::Timeout(_) => true,
        ureq::Error::Io(io) => classify_io(io.kind()) != TransientCause::Network,
        _ => false,
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn into_transport_error(err: ureq::Error) -> TransportError {
    let cause = match &err {
        ureq::Error::Timeout(_) => TransientCause::Timeout,
        ureq::Error::Io(io) => classify_io(io.kind()),
        _ => TransientCause::Network,
    };
    TransportError::new(cause, err.to_string())
}

fn classify_io(kind: io::ErrorKind) -> TransientCause {
    match kind {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransientCause::Timeout,
        io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => TransientCause::ConnectionAborted,
        _ => TransientCause::Network,
    }
}
