//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits against the node API.

mod error_conversions;
mod node_source;

pub use node_source::NodeChainSource;
