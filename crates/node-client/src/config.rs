//! # Node Client Configuration
//!
//! Connection settings for the remote node API.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ClientError;

/// Default node API endpoint.
pub const DEFAULT_NODE_URL: &str = "http://127.0.0.1:3453";

/// Largest single JSON document accepted from a streamed body (16 MiB).
pub const DEFAULT_MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// Node client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeClientConfig {
    /// Base URL of the node. Requests go to `{base_url}/api/...`.
    pub base_url: String,

    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Whole-request timeout for single-document fetches, in milliseconds.
    ///
    /// Streaming calls never use it; they are ended through cancellation.
    pub request_timeout_ms: u64,

    /// Upper bound on one JSON document inside a response body.
    pub max_frame_bytes: usize,

    /// Accept gzip-compressed responses.
    pub gzip: bool,
}

impl Default for NodeClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NODE_URL.to_string(),
            connect_timeout_ms: 5_000,
            request_timeout_ms: 30_000,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            gzip: true,
        }
    }
}

impl NodeClientConfig {
    /// Create a config pointing at `base_url` with default limits.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Create a config for testing (short timeouts, small frames).
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout_ms: 1_000,
            request_timeout_ms: 5_000,
            max_frame_bytes: 64 * 1024,
            gzip: false,
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base_url {}: {}", self.base_url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "unsupported scheme {} (expected http or https)",
                url.scheme()
            )));
        }

        if self.max_frame_bytes == 0 {
            return Err(ClientError::Config("max_frame_bytes cannot be 0".into()));
        }

        if self.request_timeout_ms == 0 {
            return Err(ClientError::Config("request_timeout_ms cannot be 0".into()));
        }

        Ok(())
    }

    /// Root of the node API, without a trailing slash.
    pub fn api_root(&self) -> String {
        format!("{}/api", self.base_url.trim_end_matches('/'))
    }
}
