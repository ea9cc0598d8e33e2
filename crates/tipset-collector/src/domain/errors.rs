//! # Domain Errors
//!
//! Error types for tipset collection.

use thiserror::Error;

/// Collector error types.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// The node could not be reached or answered with a failure status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A node response did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The frontier emptied before enough parents were discovered.
    ///
    /// Fatal for the whole collection; no partial batch is returned.
    #[error("Frontier exhausted after {discovered} of {bound} parent discoveries ({fetched} tipsets fetched)")]
    FrontierExhausted {
        /// Parent hashes discovered so far
        discovered: usize,
        /// Configured discovery bound
        bound: usize,
        /// Tipsets fetched before the frontier ran dry
        fetched: usize,
    },

    /// Invalid collector configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CollectorError {
    /// Build a decode error naming the tipset it came from.
    pub fn decode_in(tipset_hash: impl std::fmt::Display, detail: impl std::fmt::Display) -> Self {
        CollectorError::Decode(format!("tipset {}: {}", tipset_hash, detail))
    }

    /// True for node connectivity failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, CollectorError::Transport(_))
    }

    /// True for malformed node responses.
    pub fn is_decode(&self) -> bool {
        matches!(self, CollectorError::Decode(_))
    }
}
