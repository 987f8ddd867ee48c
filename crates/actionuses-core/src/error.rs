//! Error types for actionuses-core

use std::fmt;

/// Result type alias for action-uses operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for action-uses operations
#[derive(Debug)]
pub enum Error {
    /// Invalid configuration (inputs, scope, dedup selector)
    Config(String),

    /// Output path outside the workspace root
    InvalidPath(String),

    /// I/O error
    Io(std::io::Error),

    /// Runtime error (Tokio, threading, etc.)
    Runtime(String),

    /// HTTP/API error
    Http(String),

    /// API rate limit exceeded
    RateLimitExceeded(String),

    /// Write rejected because the version identifier is stale or missing
    Conflict(String),

    /// External report generator failure
    Generator(String),

    /// JSON encoding/decoding error
    Json(String),

    /// Base64 content decoding error
    Decode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Configuration messages are shown verbatim as the action failure
            Error::Config(msg) => f.write_str(msg),
            Error::InvalidPath(path) => write!(f, "{} is not an allowed path", path),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Runtime(msg) => write!(f, "Runtime error: {}", msg),
            Error::Http(msg) => write!(f, "HTTP error: {}", msg),
            Error::RateLimitExceeded(msg) => write!(f, "Rate limit exceeded: {}", msg),
            Error::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Error::Generator(msg) => write!(f, "Report generator error: {}", msg),
            Error::Json(msg) => write!(f, "JSON error: {}", msg),
            Error::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL: it is harmless, but keeps messages short in Actions logs
        Error::Http(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Decode(err.to_string())
    }
}

/// Fieldless error category for zero-cost pattern matching.
///
/// Single byte representation (`#[repr(u8)]`), `Copy`, no allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    /// Configuration error
    Config,
    /// Invalid file path error
    InvalidPath,
    /// I/O operation error
    Io,
    /// Runtime error
    Runtime,
    /// HTTP/API error
    Http,
    /// API rate limit exceeded
    RateLimitExceeded,
    /// Stale or missing version identifier
    Conflict,
    /// Report generator error
    Generator,
    /// JSON error
    Json,
    /// Base64 decoding error
    Decode,
}

impl Error {
    /// Get the error kind, zero allocation.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::InvalidPath(_) => ErrorKind::InvalidPath,
            Error::Io(_) => ErrorKind::Io,
            Error::Runtime(_) => ErrorKind::Runtime,
            Error::Http(_) => ErrorKind::Http,
            Error::RateLimitExceeded(_) => ErrorKind::RateLimitExceeded,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::Generator(_) => ErrorKind::Generator,
            Error::Json(_) => ErrorKind::Json,
            Error::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Borrow the error message, zero allocation.
    #[inline]
    pub fn message(&self) -> &str {
        match self {
            Error::Config(msg)
            | Error::InvalidPath(msg)
            | Error::Runtime(msg)
            | Error::Http(msg)
            | Error::RateLimitExceeded(msg)
            | Error::Conflict(msg)
            | Error::Generator(msg)
            | Error::Json(msg)
            | Error::Decode(msg) => msg,
            Error::Io(_) => "I/O error",
        }
    }
}
