//! # Algorithms Module
//!
//! Traversal, pruning and block inflation.

pub mod inflation;
pub mod traversal;

pub use inflation::{decode_params, inflate_block};
pub use traversal::{prune, stable_height, CollectionState, Observation, StableBatch};
