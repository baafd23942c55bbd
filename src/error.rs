// src/error.rs
//! Application error types with structured error handling.
//!
//! The request engine is the sole translator from transport/HTTP detail
//! into these kinds; every layer above it (paginator, tree operations,
//! per-endpoint operations) propagates failures unchanged.

use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// Instead of matching against magic strings like `"rate_limited"`,
/// the domain vocabulary is encoded in the type system. Each variant
/// tells you exactly what the Notion API reported and enables
/// pattern-based handling without stringly-typed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body carries no code
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound)
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// Malformed caller input. Always local; never sent over the wire.
    #[error("Validation error ({code}): {message}")]
    Validation { code: String, message: String },

    /// The server rejected the request with an error body.
    #[error("Notion API returned an error ({code}): {message}")]
    Api {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    /// Retry budget exhausted under sustained 429 responses.
    #[error("Rate limited after {attempts} attempts; retry after {retry_after}s")]
    RateLimited { attempts: u32, retry_after: f64 },

    /// Transport failure before any response was received. Never retried.
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Convenience constructor for local validation failures.
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable code for CLI error reporting.
    pub fn code(&self) -> String {
        match self {
            Self::MissingConfiguration(_) => "auth_missing".to_string(),
            Self::Validation { code, .. } => code.clone(),
            Self::Api { code, .. } => code.to_string(),
            Self::RateLimited { .. } => "rate_limited".to_string(),
            Self::Connection(_) => "connection_error".to_string(),
            Self::MalformedResponse(_) => "malformed_response".to_string(),
            Self::ValidationError(_) => "invalid_api_key".to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
