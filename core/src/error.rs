//! Error types for the log service client.
//!
//! # Design
//! Three classes of failure, kept apart because callers react differently to
//! each: configuration problems are caught before any network I/O, transport
//! problems describe the round trip itself, and parse problems mean the
//! service answered with something the client cannot interpret. Absence
//! ("no such log", "no such entry", "no page for that date") is never an
//! error — operations model it as `Ok(None)`.

use std::fmt;

/// Errors returned by `LogServiceClient` operations.
#[derive(Debug)]
pub enum ApiError {
    /// The admin API token is unset or blank but the operation requires it.
    /// Raised before the request is sent.
    MissingAdminToken,

    /// The request could not be completed: connection failure, timeout, or
    /// another error reported by the HTTP agent.
    TransportError(String),

    /// The server answered with a non-success status on a read operation.
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),

    /// A command-usage string did not match the `name/count` encoding.
    CommandFormatError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingAdminToken => {
                write!(f, "admin API token is required for this operation")
            }
            ApiError::TransportError(msg) => write!(f, "transport failed: {msg}"),
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::CommandFormatError(msg) => {
                write!(f, "malformed command usage string: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
