//! # Bounded Tipset Traversal
//!
//! Breadth-first walk from the chain heads back through parent links.
//!
//! ## Termination
//!
//! The walk stops once `discovery_bound` previously unseen parents have been
//! queued. Blocks at or below the caller's floor are dropped without queuing
//! their parents, so they never move the walk toward the bound. If the
//! frontier empties first, the collection fails.
//!
//! ## Pruning
//!
//! A block's height is recorded whenever it differs from the last recorded
//! height, so consecutive blocks at one height leave a single entry. The
//! first `unstable_heights` entries are still being extended by sibling
//! branches when the walk stops, so the next entry is the stable height and
//! only blocks at or below it are returned.

use std::collections::{HashSet, VecDeque};

use crate::domain::{Block, HeadReference};

/// What happened to one fetched block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Accumulated; `new_parents` unseen parents were queued.
    Accepted {
        /// Parents queued by this block
        new_parents: usize,
    },
    /// At or below the floor; dropped.
    BelowFloor,
}

/// Per-invocation traversal state. Owned by exactly one `collect` call.
#[derive(Debug, Default)]
pub struct CollectionState {
    frontier: VecDeque<HeadReference>,
    enqueued: HashSet<HeadReference>,
    accumulated: Vec<Block>,
    heights: Vec<u64>,
    discovered: usize,
    dequeued: usize,
}

impl CollectionState {
    /// Start a walk from `heads`. Duplicate heads are queued once and do
    /// not count as discoveries.
    pub fn seed<I>(heads: I) -> Self
    where
        I: IntoIterator<Item = HeadReference>,
    {
        let mut state = Self::default();
        for head in heads {
            if state.enqueued.insert(head.clone()) {
                state.frontier.push_back(head);
            }
        }
        state
    }

    /// Previously unseen parents queued so far.
    pub fn discovered(&self) -> usize {
        self.discovered
    }

    /// Tipsets taken off the frontier so far.
    pub fn dequeued(&self) -> usize {
        self.dequeued
    }

    /// Tipsets waiting on the frontier.
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Blocks accumulated so far.
    pub fn accumulated(&self) -> &[Block] {
        &self.accumulated
    }

    /// Recorded heights, earliest discovered first.
    pub fn heights(&self) -> &[u64] {
        &self.heights
    }

    /// True once enough parents have been discovered.
    pub fn bound_reached(&self, discovery_bound: usize) -> bool {
        self.discovered >= discovery_bound
    }

    /// Next tipset to fetch.
    pub fn next_head(&mut self) -> Option<HeadReference> {
        let head = self.frontier.pop_front()?;
        self.dequeued += 1;
        Some(head)
    }

    /// Fold a fetched block into the walk.
    pub fn observe(&mut self, block: Block, floor: u64) -> Observation {
        if block.height <= floor {
            return Observation::BelowFloor;
        }

        let mut new_parents = 0;
        for parent in &block.parents {
            if self.enqueued.insert(parent.clone()) {
                self.frontier.push_back(parent.clone());
                new_parents += 1;
            }
        }
        self.discovered += new_parents;

        if self.heights.last() != Some(&block.height) {
            self.heights.push(block.height);
        }
        self.accumulated.push(block);

        Observation::Accepted { new_parents }
    }

    /// Finish the walk and prune to the stable height.
    pub fn into_stable_batch(self, unstable_heights: usize) -> StableBatch {
        let stable_height = stable_height(&self.heights, unstable_heights);
        let accumulated = self.accumulated.len();
        let recorded_heights = self.heights.len();
        let blocks = prune(self.accumulated, stable_height);

        StableBatch {
            blocks,
            stable_height,
            accumulated,
            recorded_heights,
            fetched: self.dequeued,
            discovered: self.discovered,
        }
    }
}

/// Result of a finished walk.
#[derive(Debug, Clone)]
pub struct StableBatch {
    /// Blocks at or below the stable height, in accumulation order.
    pub blocks: Vec<Block>,
    /// Stable height, if the walk went deep enough.
    pub stable_height: Option<u64>,
    /// Blocks accumulated before pruning.
    pub accumulated: usize,
    /// Entries in the height record.
    pub recorded_heights: usize,
    /// Tipsets fetched.
    pub fetched: usize,
    /// Parents discovered.
    pub discovered: usize,
}

/// Stable height for heights listed earliest discovered first.
///
/// Skips the first `unstable_heights` entries and takes the next one.
pub fn stable_height(heights_in_discovery_order: &[u64], unstable_heights: usize) -> Option<u64> {
    heights_in_discovery_order.get(unstable_heights).copied()
}

/// Keep blocks at or below `stable_height`; nothing if it is undefined.
pub fn prune(blocks: Vec<Block>, stable_height: Option<u64>) -> Vec<Block> {
    match stable_height {
        Some(stable) => blocks.into_iter().filter(|b| b.height <= stable).collect(),
        None => Vec::new(),
    }
}
