//! # Domain Invariants
//!
//! Rules a finished collection must satisfy.

use std::collections::HashSet;
use std::hash::Hash;

use super::entities::Block;

/// Parent discoveries after which traversal stops.
pub const DEFAULT_DISCOVERY_BOUND: usize = 5;

/// Number of earliest recorded heights treated as unstable.
pub const DEFAULT_UNSTABLE_HEIGHTS: usize = 2;

/// Invariant: every returned block is strictly above the floor.
pub fn invariant_above_floor(blocks: &[Block], floor: u64) -> bool {
    blocks.iter().all(|b| b.height > floor)
}

/// Invariant: no returned block is above the stable height.
pub fn invariant_at_or_below_stable(blocks: &[Block], stable_height: Option<u64>) -> bool {
    match stable_height {
        Some(stable) => blocks.iter().all(|b| b.height <= stable),
        None => blocks.is_empty(),
    }
}

/// Invariant: nothing was fetched twice.
pub fn invariant_fetched_once<T: Eq + Hash>(fetch_log: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(fetch_log.len());
    fetch_log.iter().all(|item| seen.insert(item))
}

/// Invariant: no two consecutive entries of the height record are equal.
pub fn invariant_no_adjacent_heights(heights: &[u64]) -> bool {
    heights.windows(2).all(|pair| pair[0] != pair[1])
}

/// Invariant: message indices run 0..n in order.
pub fn invariant_messages_indexed(block: &Block) -> bool {
    block
        .messages
        .iter()
        .enumerate()
        .all(|(i, m)| m.index == i && m.height == block.height && m.tipset_hash == block.tipset_hash)
}
