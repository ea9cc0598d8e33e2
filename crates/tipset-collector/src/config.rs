//! # Collector Configuration
//!
//! Traversal bounds and node endpoint paths.

use serde::{Deserialize, Serialize};

use crate::domain::{CollectorError, DEFAULT_DISCOVERY_BOUND, DEFAULT_UNSTABLE_HEIGHTS};

/// Collector configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Parent discoveries after which traversal stops.
    pub discovery_bound: usize,

    /// Earliest recorded heights excluded from the result.
    pub unstable_heights: usize,

    /// API path listing the chain heads.
    pub heads_path: String,

    /// API path prefix for a single tipset; the identifier is appended.
    pub block_path: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            discovery_bound: DEFAULT_DISCOVERY_BOUND,
            unstable_heights: DEFAULT_UNSTABLE_HEIGHTS,
            heads_path: "chain/head".to_string(),
            block_path: "show/block".to_string(),
        }
    }
}

impl CollectorConfig {
    /// Create a config for testing (shallow walks).
    pub fn for_testing() -> Self {
        Self {
            discovery_bound: 3,
            ..Self::default()
        }
    }

    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<(), CollectorError> {
        if self.discovery_bound == 0 {
            return Err(CollectorError::Config(
                "discovery_bound must be at least 1".to_string(),
            ));
        }
        if self.heads_path.trim().is_empty() || self.block_path.trim().is_empty() {
            return Err(CollectorError::Config("endpoint paths must not be empty".to_string()));
        }
        Ok(())
    }
}
