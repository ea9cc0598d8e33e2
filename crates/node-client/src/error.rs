//! # Client Errors
//!
//! Error types for node API calls.

use std::fmt;

use thiserror::Error;

/// Errors that can occur when talking to the node API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection failure, broken body, or abort before completion.
    #[error("transport error: {0}")]
    Transport(String),

    /// Node answered with a non-2xx status.
    #[error("node returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Leading part of the response body
        body: String,
    },

    /// Response body could not be parsed into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// A stream item consumer rejected an item.
    #[error("stream processor failed: {0}")]
    Processor(#[from] ProcessorError),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// True for failures of the connection itself (including non-2xx answers).
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Status { .. })
    }

    /// True when the node's answer could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, ClientError::Decode(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

/// Error raised by a stream item consumer.
///
/// Ends the stream and is reported through the stream's error outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorError {
    message: String,
}

impl ProcessorError {
    /// Create a processor error from any displayable cause.
    pub fn new(cause: impl fmt::Display) -> Self {
        Self {
            message: cause.to_string(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProcessorError {}
