//! # Outbound Ports
//!
//! Traits for what the collector needs from the node.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::wire::{CidLink, NumericField, RawBlock, RawHeader};
use crate::domain::{CollectorError, HeadReference};

/// Chain data source - outbound port.
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Current chain heads, as listed by the node.
    async fn chain_heads(&self) -> Result<Vec<HeadReference>, CollectorError>;

    /// Undecoded tipset body for `tipset_hash`.
    async fn raw_block(&self, tipset_hash: &HeadReference) -> Result<RawBlock, CollectorError>;

    /// Source identifier (for logging).
    fn source_id(&self) -> &str;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// In-memory chain for testing. Records every block fetch.
#[derive(Clone, Default)]
pub struct MockChainSource {
    /// Identifier.
    pub id: String,
    /// Heads returned by `chain_heads`.
    pub heads: Vec<HeadReference>,
    /// Tipset bodies by identifier.
    pub blocks: HashMap<HeadReference, RawBlock>,
    /// Fail every call?
    pub should_fail: bool,
    /// Fail only when this tipset is fetched.
    pub fail_on: Option<HeadReference>,
    fetch_log: Arc<Mutex<Vec<HeadReference>>>,
}

impl MockChainSource {
    /// Empty chain with the given heads.
    pub fn with_heads<I, H>(heads: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<HeadReference>,
    {
        Self {
            id: "mock-chain".to_string(),
            heads: heads.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Chain whose every call fails with a transport error.
    pub fn failing() -> Self {
        Self {
            id: "mock-chain".to_string(),
            should_fail: true,
            ..Default::default()
        }
    }

    /// Add a tipset without messages.
    pub fn tipset(mut self, cid: &str, height: u64, parents: &[&str]) -> Self {
        let raw = RawBlock {
            header: RawHeader {
                height: Some(NumericField::from(height)),
                parents: Some(
                    parents
                        .iter()
                        .map(|p| CidLink { cid: p.to_string() })
                        .collect(),
                ),
                miner: Some("t01000".to_string()),
                parent_weight: Some(NumericField::from(height * 10)),
            },
            messages: None,
        };
        self.blocks.insert(cid.into(), raw);
        self
    }

    /// Add an arbitrary tipset body.
    pub fn raw_tipset(mut self, cid: &str, raw: RawBlock) -> Self {
        self.blocks.insert(cid.into(), raw);
        self
    }

    /// Tipsets fetched so far, in order.
    pub fn fetch_log(&self) -> Vec<HeadReference> {
        self.fetch_log.lock().clone()
    }
}

#[async_trait]
impl ChainSource for MockChainSource {
    async fn chain_heads(&self) -> Result<Vec<HeadReference>, CollectorError> {
        if self.should_fail {
            return Err(CollectorError::Transport("Mock failure".to_string()));
        }
        Ok(self.heads.clone())
    }

    async fn raw_block(&self, tipset_hash: &HeadReference) -> Result<RawBlock, CollectorError> {
        self.fetch_log.lock().push(tipset_hash.clone());

        if self.should_fail || self.fail_on.as_ref() == Some(tipset_hash) {
            return Err(CollectorError::Transport("Mock failure".to_string()));
        }

        self.blocks
            .get(tipset_hash)
            .cloned()
            .ok_or_else(|| CollectorError::Transport(format!("unknown tipset {}", tipset_hash)))
    }

    fn source_id(&self) -> &str {
        &self.id
    }
}
