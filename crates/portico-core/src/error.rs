//! Error types for Portico.
//!
//! Two families of errors cross the dispatch boundary:
//!
//! - [`BindError`] is produced while decoding and validating a request target.
//!   It never reaches the handler; the wrapper turns it into a 406 or 400.
//! - [`HandlerError`] is returned by handlers. Its status code and message are
//!   written back verbatim.
//!
//! Both render through the same [`ErrorEnvelope`] JSON shape:
//!
//! ```json
//! { "error": { "code": "MALFORMED_REQUEST", "message": "..." } }
//! ```

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type alias using [`BindError`].
pub type BindResult<T> = Result<T, BindError>;

/// Part of the request a binding error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindSource {
    /// URL query string
    Query,
    /// JSON request body
    Json,
    /// URL-encoded form body
    Form,
    /// Multipart form body
    Multipart,
    /// Content-Type header
    ContentType,
    /// The bound target (validation)
    Target,
}

impl fmt::Display for BindSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Json => write!(f, "json body"),
            Self::Form => write!(f, "form body"),
            Self::Multipart => write!(f, "multipart body"),
            Self::ContentType => write!(f, "content-type"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Error raised while binding a request into its target.
///
/// # Example
///
/// ```rust
/// use portico_core::BindError;
/// use http::StatusCode;
///
/// let err = BindError::invalid_content_type(Some("text/plain"));
/// assert_eq!(err.status_code(), StatusCode::NOT_ACCEPTABLE);
///
/// let err = BindError::json("expected value at line 1 column 1");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BindError {
    /// The body is present but its Content-Type is not one the binder decodes.
    #[error("invalid content-type: {content_type}")]
    InvalidContentType {
        /// The Content-Type the client sent, or `none`.
        content_type: String,
    },

    /// The query string or body could not be decoded into the target.
    #[error("malformed request: failed to decode {origin}: {message}")]
    Malformed {
        /// Where decoding failed.
        origin: BindSource,
        /// Decoder message.
        message: String,
    },

    /// A multipart body exceeded one of the configured limits.
    #[error("malformed request: {origin} exceeds limit of {limit} {unit}")]
    LimitExceeded {
        /// Where the limit was hit.
        origin: BindSource,
        /// The configured limit.
        limit: usize,
        /// Unit of the limit (`bytes` or `fields`).
        unit: &'static str,
    },

    /// The decoded target violated its declared constraints.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

impl BindError {
    /// Creates an invalid content type error.
    #[must_use]
    pub fn invalid_content_type(actual: Option<&str>) -> Self {
        Self::InvalidContentType {
            content_type: actual.unwrap_or("none").to_string(),
        }
    }

    /// Creates a malformed request error for an arbitrary source.
    #[must_use]
    pub fn malformed(origin: BindSource, message: impl Into<String>) -> Self {
        Self::Malformed {
            origin,
            message: message.into(),
        }
    }

    /// Creates a query decoding error.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::malformed(BindSource::Query, message)
    }

    /// Creates a JSON decoding error.
    #[must_use]
    pub fn json(message: impl Into<String>) -> Self {
        Self::malformed(BindSource::Json, message)
    }

    /// Creates a URL-encoded form decoding error.
    #[must_use]
    pub fn form(message: impl Into<String>) -> Self {
        Self::malformed(BindSource::Form, message)
    }

    /// Creates a multipart parsing error.
    #[must_use]
    pub fn multipart(message: impl Into<String>) -> Self {
        Self::malformed(BindSource::Multipart, message)
    }

    /// Creates an error for a multipart body over its in-memory byte budget.
    #[must_use]
    pub fn too_large(limit: usize) -> Self {
        Self::LimitExceeded {
            origin: BindSource::Multipart,
            limit,
            unit: "bytes",
        }
    }

    /// Creates an error for a multipart body with too many fields.
    #[must_use]
    pub fn too_many_fields(limit: usize) -> Self {
        Self::LimitExceeded {
            origin: BindSource::Multipart,
            limit,
            unit: "fields",
        }
    }

    /// Returns the part of the request the error came from.
    #[must_use]
    pub const fn origin(&self) -> BindSource {
        match self {
            Self::InvalidContentType { .. } => BindSource::ContentType,
            Self::Malformed { origin, .. } | Self::LimitExceeded { origin, .. } => *origin,
            Self::Validation(_) => BindSource::Target,
        }
    }

    /// Returns `true` for the distinguished unsupported Content-Type error.
    #[must_use]
    pub const fn is_invalid_content_type(&self) -> bool {
        matches!(self, Self::InvalidContentType { .. })
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Only an unsupported Content-Type maps to 406; every other failure is a
    /// malformed request.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidContentType { .. } => StatusCode::NOT_ACCEPTABLE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidContentType { .. } => "INVALID_CONTENT_TYPE",
            Self::Malformed { .. } | Self::LimitExceeded { .. } => "MALFORMED_REQUEST",
            Self::Validation(_) => "VALIDATION_FAILED",
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        let details = match self {
            Self::Validation(errors) => serde_json::to_value(errors.violations()).ok(),
            Self::Malformed { origin, .. } | Self::LimitExceeded { origin, .. } => {
                Some(serde_json::json!({ "source": origin }))
            }
            Self::InvalidContentType { content_type } => {
                Some(serde_json::json!({ "content_type": content_type }))
            }
        };

        ErrorEnvelope::new(self.error_code(), self.to_string(), details)
    }
}

/// Error returned by a handler.
///
/// The wrapper writes it back with the handler's chosen status code and the
/// error rendered as an [`ErrorEnvelope`]; the handler's result value is never
/// looked at once an error is returned.
///
/// # Example
///
/// ```rust
/// use portico_core::HandlerError;
/// use http::StatusCode;
///
/// let err = HandlerError::not_found("user 42 does not exist");
/// assert_eq!(err.status(), StatusCode::NOT_FOUND);
/// assert_eq!(err.code(), "NOT_FOUND");
/// ```
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HandlerError {
    status: StatusCode,
    code: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl HandlerError {
    /// Creates a handler error with an explicit status code.
    ///
    /// The error code defaults to the upper-snake-case canonical reason of the
    /// status (`404` becomes `NOT_FOUND`).
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code: default_code(status),
            message: message.into(),
            details: None,
        }
    }

    /// 400 Bad Request.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 404 Not Found.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 409 Conflict.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// 422 Unprocessable Entity.
    #[must_use]
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Overrides the machine-readable error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Attaches structured details to the error body.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Returns the status code chosen by the handler.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the structured details, if any.
    #[must_use]
    pub const fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref()
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.code.clone(), self.message.clone(), self.details.clone())
    }
}

fn default_code(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(|reason| {
            reason
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
                .collect()
        })
        .unwrap_or_else(|| format!("HTTP_{}", status.as_u16()))
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
}

impl ErrorEnvelope {
    /// Creates a new envelope.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details,
            },
        }
    }
}

/// Error detail within an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
