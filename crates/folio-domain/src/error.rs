//! Failure taxonomy shared by every component
//!
//! Components return typed failures instead of panicking across their
//! boundaries. [`ApiError`] is what finally reaches a caller: a numeric
//! status, a short category label and a human-readable message.

use crate::book::BookId;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Category of a user-visible failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid input
    BadRequest,
    /// Resource absent upstream
    NotFound,
    /// Upstream timeout
    ServiceUnavailable,
    /// Everything else, including malformed LLM output
    InternalError,
}

impl ErrorKind {
    /// HTTP status code for this category
    pub fn status(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::ServiceUnavailable => 503,
            ErrorKind::InternalError => 500,
        }
    }

    /// Short category label
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
            ErrorKind::InternalError => "Internal Server Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A failure as presented to the caller
///
/// Serializes as `{"status": 404, "error": "Not Found", "message": "..."}`.
///
/// # Examples
///
/// ```
/// use folio_domain::{ApiError, ErrorKind};
///
/// let err = ApiError::not_found("Book with ID 99 not found");
/// assert_eq!(err.kind, ErrorKind::NotFound);
/// assert_eq!(err.status(), 404);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    /// Failure category
    pub kind: ErrorKind,
    /// Human-readable description, free of internal details
    pub message: String,
}

impl ApiError {
    /// Create an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// 503 Service Unavailable
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }

    /// Numeric status of this error
    pub fn status(&self) -> u16 {
        self.kind.status()
    }
}

impl Serialize for ApiError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            status: u16,
            error: &'a str,
            message: &'a str,
        }

        Body {
            status: self.status(),
            error: self.kind.label(),
            message: &self.message,
        }
        .serialize(serializer)
    }
}

/// Failures raised by the remote library and its local cache
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    /// The library answered 404 for this book
    #[error("book {0} is not available")]
    NotAvailable(BookId),

    /// The request for this book timed out
    #[error("request for book {0} timed out")]
    TemporarilyUnavailable(BookId),

    /// Any other transport, status or I/O failure
    #[error("library error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::BadRequest.status(), 400);
        assert_eq!(ErrorKind::NotFound.status(), 404);
        assert_eq!(ErrorKind::ServiceUnavailable.status(), 503);
        assert_eq!(ErrorKind::InternalError.status(), 500);
    }

    #[test]
    fn test_serializes_as_status_error_message() {
        let err = ApiError::service_unavailable("Groq API request timeout");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": 503,
                "error": "Service Unavailable",
                "message": "Groq API request timeout",
            })
        );
    }

    #[test]
    fn test_display() {
        let err = ApiError::internal("Analysis failed for book 11");
        assert_eq!(
            err.to_string(),
            "Internal Server Error: Analysis failed for book 11"
        );
    }

    #[test]
    fn test_library_error_display() {
        let id = BookId::parse("11").unwrap();
        assert_eq!(
            LibraryError::NotAvailable(id.clone()).to_string(),
            "book 11 is not available"
        );
        assert_eq!(
            LibraryError::TemporarilyUnavailable(id).to_string(),
            "request for book 11 timed out"
        );
    }
}
