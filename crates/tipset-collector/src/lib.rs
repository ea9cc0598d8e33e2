//! # Tipset Collector
//!
//! Discovers recently produced, not yet finalized tipsets by walking back
//! from the node's current heads through parent links.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Several heads may coexist while the chain has not converged. The
//! collector walks all of them breadth-first, stops after a fixed number of
//! newly discovered parents, and returns only the tipsets at or below the
//! stable height, so that repeated calls see a consistent snapshot.
//!
//! ## Collection Rules
//!
//! | Rule | Effect |
//! |------|--------|
//! | Dedup | Each tipset is fetched at most once per call |
//! | Discovery bound | Stop after 5 new parents have been queued |
//! | Floor | Tipsets at or below the floor are dropped, their parents ignored |
//! | Finality window | The 2 earliest discovered heights are excluded |
//! | Shallow walk | Fewer than 3 recorded heights yields an empty batch |
//!
//! Any fetch or decode failure aborts the call; partial batches are never
//! returned.
//!
//! ## Module Structure
//!
//! ```text
//! tipset-collector/
//! ├── domain/          # Block, Message, Decimal, wire shapes, errors
//! ├── algorithms/      # Traversal state, pruning, block inflation
//! ├── ports/           # API trait (inbound), ChainSource + decoders (outbound)
//! ├── adapters/        # NodeChainSource over the node HTTP API
//! ├── application/     # TipsetCollector orchestrating everything
//! └── config.rs        # CollectorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::NodeChainSource;
pub use algorithms::{
    decode_params, inflate_block, prune, stable_height, CollectionState, Observation, StableBatch,
};
pub use application::TipsetCollector;
pub use config::CollectorConfig;
pub use domain::{
    Block, CollectorError, Decimal, DecimalParseError, HeadReference, Message, Params,
    DEFAULT_DISCOVERY_BOUND, DEFAULT_UNSTABLE_HEIGHTS,
    invariant_above_floor, invariant_at_or_below_stable, invariant_fetched_once,
    invariant_no_adjacent_heights, invariant_messages_indexed,
};
pub use ports::{ChainSource, DecoderTable, MockChainSource, ParamDecoder, TipsetCollectorApi};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
