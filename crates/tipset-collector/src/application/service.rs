//! # Tipset Collector Service
//!
//! Application service running one bounded traversal per `collect` call.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::algorithms::{inflate_block, CollectionState, Observation};
use crate::config::CollectorConfig;
use crate::domain::{invariant_above_floor, invariant_at_or_below_stable, Block, CollectorError, HeadReference};
use crate::ports::{ChainSource, DecoderTable, TipsetCollectorApi};

/// Tipset collector - walks recent tipsets and returns a stable batch.
///
/// Holds no per-call state; concurrent `collect` calls are independent.
pub struct TipsetCollector<S: ChainSource> {
    /// Configuration.
    config: CollectorConfig,
    /// Where tipsets come from.
    source: Arc<S>,
    /// Read-only parameter decoders.
    decoders: Arc<DecoderTable>,
}

impl<S: ChainSource> TipsetCollector<S> {
    /// Create a new collector.
    pub fn new(
        config: CollectorConfig,
        source: Arc<S>,
        decoders: Arc<DecoderTable>,
    ) -> Result<Self, CollectorError> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            decoders,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// The chain source.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Internal: walk until the discovery bound is met.
    async fn traverse(&self, floor: u64) -> Result<CollectionState, CollectorError> {
        let heads = self.source.chain_heads().await?;
        info!(source = self.source.source_id(), heads = heads.len(), "fetching heads");

        let bound = self.config.discovery_bound;
        let mut state = CollectionState::seed(heads);

        while !state.bound_reached(bound) {
            let Some(head) = state.next_head() else {
                warn!(
                    discovered = state.discovered(),
                    bound,
                    fetched = state.dequeued(),
                    floor,
                    "frontier exhausted before discovery bound"
                );
                return Err(CollectorError::FrontierExhausted {
                    discovered: state.discovered(),
                    bound,
                    fetched: state.dequeued(),
                });
            };

            let block = self.fetch_tipset(&head).await?;
            let height = block.height;
            match state.observe(block, floor) {
                Observation::Accepted { new_parents } => debug!(
                    tipset = head.short(),
                    height,
                    new_parents,
                    discovered = state.discovered(),
                    "accumulated tipset"
                ),
                Observation::BelowFloor => debug!(
                    tipset = head.short(),
                    height,
                    floor,
                    "tipset at or below floor, dropped"
                ),
            }
        }

        Ok(state)
    }

    async fn fetch_tipset(&self, tipset_hash: &HeadReference) -> Result<Block, CollectorError> {
        debug!(tipset = %tipset_hash, "fetching tipset");
        let raw = self.source.raw_block(tipset_hash).await?;
        inflate_block(tipset_hash.clone(), raw, &self.decoders)
    }
}

#[async_trait]
impl<S: ChainSource + 'static> TipsetCollectorApi for TipsetCollector<S> {
    async fn collect(&self, floor: u64) -> Result<Vec<Block>, CollectorError> {
        let state = self.traverse(floor).await?;
        let batch = state.into_stable_batch(self.config.unstable_heights);

        debug_assert!(invariant_above_floor(&batch.blocks, floor));
        debug_assert!(invariant_at_or_below_stable(&batch.blocks, batch.stable_height));

        info!(
            floor,
            stable_height = ?batch.stable_height,
            recorded_heights = batch.recorded_heights,
            fetched = batch.fetched,
            accumulated = batch.accumulated,
            returned = batch.blocks.len(),
            "pruned to stable height"
        );
        Ok(batch.blocks)
    }

    async fn fetch_block(&self, tipset_hash: &HeadReference) -> Result<Block, CollectorError> {
        self.fetch_tipset(tipset_hash).await
    }

    async fn heads(&self) -> Result<Vec<HeadReference>, CollectorError> {
        self.source.chain_heads().await
    }
}
