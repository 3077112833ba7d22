//! Error types for the GreenTrade API client.
//!
//! # Design
//! Every failure, whatever its origin, ends up as one `ApiError` whose
//! `Display` is the human-readable message callers show to users. The
//! variant carries the classification: only `Transient` failures (no HTTP
//! response at all) are eligible for retry.
//!
//! Error bodies are decoded against the backend's `{"detail": ...}` shape.
//! The message is the `detail` string, or the JSON text of a structured
//! `detail`, or the transport message, or [`FALLBACK_MESSAGE`].

use serde::Deserialize;
use serde_json::Value;

use crate::http::HttpResponse;

/// Message used when neither the server nor the transport said anything.
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Why a request never produced an HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientCause {
    Timeout,
    ConnectionAborted,
    Network,
}

/// Coarse classification of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Validation,
    NotFound,
    Server,
    Decode,
    Encode,
}

/// Errors returned by every client operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No HTTP response was received (timeout, aborted connection,
    /// unreachable host).
    #[error("{message}")]
    Transient {
        cause: TransientCause,
        message: String,
    },

    /// The request was rejected, by the server with a 4xx other than 404
    /// or locally before it was sent (`status` is `None`).
    #[error("{message}")]
    Validation {
        status: Option<u16>,
        message: String,
    },

    /// The server returned 404.
    #[error("{message}")]
    NotFound { message: String },

    /// The server returned 5xx, or a status the client does not expect.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A successful response body did not match the expected shape.
    #[error("{0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("{0}")]
    Encode(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            status: None,
            message: message.into(),
        }
    }

    /// Builds a transient error, falling back to [`FALLBACK_MESSAGE`] when
    /// the transport gave no message.
    pub fn transient(cause: TransientCause, message: impl Into<String>) -> Self {
        let message = message.into();
        ApiError::Transient {
            cause,
            message: if message.trim().is_empty() {
                FALLBACK_MESSAGE.to_string()
            } else {
                message
            },
        }
    }

    /// Normalizes a non-2xx response.
    pub fn from_response(response: &HttpResponse) -> Self {
        let message =
            decode_error_detail(&response.body).unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        match response.status {
            404 => ApiError::NotFound { message },
            status @ 400..=499 => ApiError::Validation {
                status: Some(status),
                message,
            },
            status => ApiError::Server { status, message },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transient { .. } => ErrorKind::Transient,
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Decode(_) => ErrorKind::Decode,
            ApiError::Encode(_) => ErrorKind::Encode,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Transient { message, .. }
            | ApiError::Validation { message, .. }
            | ApiError::NotFound { message }
            | ApiError::Server { message, .. } => message,
            ApiError::Decode(message) | ApiError::Encode(message) => message,
        }
    }

    /// HTTP status of the response behind this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation { status, .. } => *status,
            ApiError::NotFound { .. } => Some(404),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

/// Extracts the `detail` field of an error body. Structured details are
/// serialized back to JSON text so nothing is lost.
pub fn decode_error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        structured => Some(structured.to_string()),
    }
}
