//! Error types for HTTP request framing.

use std::io;

use thiserror::Error;

/// Errors surfaced while reading or writing an HTTP message.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request head or body exceeds its size bound.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge {
        /// Observed size in bytes.
        size: usize,
        /// Enforced limit in bytes.
        max_size: usize,
    },
    /// The request does not parse as HTTP/1.1.
    #[error("malformed request: {message}")]
    Malformed {
        /// What failed to parse.
        message: String,
    },
    /// The `Content-Length` header does not parse as a byte count.
    #[error("invalid content length '{value}'")]
    InvalidContentLength {
        /// The header value, verbatim.
        value: String,
    },
    /// IO error during read or write.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl HttpError {
    /// Creates a request-too-large error.
    pub(crate) fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }

    /// Creates a malformed-request error.
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates an invalid content-length error.
    pub(crate) fn invalid_content_length(value: impl Into<String>) -> Self {
        Self::InvalidContentLength {
            value: value.into(),
        }
    }
}
