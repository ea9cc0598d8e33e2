//! # Inbound Ports
//!
//! API trait defining what the collector offers.

use async_trait::async_trait;

use crate::domain::{Block, CollectorError, HeadReference};

/// Tipset collector API - inbound port.
#[async_trait]
pub trait TipsetCollectorApi: Send + Sync {
    /// Walk back from the current heads and return every block at or below
    /// the stable height and strictly above `floor`.
    ///
    /// Result order is unspecified. Fails as a whole; no partial batch.
    async fn collect(&self, floor: u64) -> Result<Vec<Block>, CollectorError>;

    /// Fetch and inflate a single tipset.
    async fn fetch_block(&self, tipset_hash: &HeadReference) -> Result<Block, CollectorError>;

    /// Current chain heads.
    async fn heads(&self) -> Result<Vec<HeadReference>, CollectorError>;
}
