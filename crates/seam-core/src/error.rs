//! Error types for the Seam core library
//!
//! This module defines the error handling system shared by every boundary
//! component, using thiserror for ergonomic error definitions and anyhow
//! for flexible error sources from pluggable collaborators.

use thiserror::Error;

/// Main error type for Seam operations
#[derive(Error, Debug)]
pub enum Error {
    /// A payload could not be decoded into the expected shape.
    ///
    /// Decode failures are local and recoverable; they are returned to the
    /// immediate caller and never terminate the process.
    #[error("Payload decode failed: {message}")]
    Decode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded into an opaque payload
    #[error("Payload encode failed: {message}")]
    Encode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// An opaque index resolved to no live registry entry
    #[error("No live object registered under index {index}")]
    UnknownHandle { index: i64 },

    /// An opaque index resolved to an object of a different kind
    #[error("Object under index {index} is not a {expected}")]
    HandleKind {
        index: i64,
        expected: &'static str,
    },

    /// Caller-supplied argument violated the boundary contract
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Background work backing a future failed
    #[error("Worker failed: {message}")]
    Worker {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl Error {
    /// Build a decode error from a serde_json failure
    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Decode {
            message: context.into(),
            source,
        }
    }

    /// Build an encode error from a serde_json failure
    pub fn encode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Encode {
            message: context.into(),
            source,
        }
    }

    /// Build an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    /// Build a worker error without an underlying source
    pub fn worker(message: impl Into<String>) -> Self {
        Error::Worker {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error is safe to surface to the caller and retry
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Decode { .. } | Error::Encode { .. })
    }
}

/// Result type alias for Seam operations
pub type Result<T> = std::result::Result<T, Error>;
