//! Chunker — splits a repeatable section into page-sized runs of blocks.
//!
//! Single-pass greedy fill. Blocks keep their display order; there is no reordering
//! for tighter packing. A block whose own cost exceeds capacity is placed alone and
//! allowed to overflow its page rather than being dropped.

use serde::{Deserialize, Serialize};

use crate::layout::estimator::CostModel;
use crate::models::resume::RepeatableBlock;

/// Tolerance for float drift when a run sums to exactly the capacity.
const EPSILON: f64 = 1e-9;

/// A maximal run of consecutive blocks from one section assigned to the same page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub blocks: Vec<RepeatableBlock>,
    /// Sum of the estimated costs of `blocks`.
    pub cost: f64,
}

impl Chunk {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            cost: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// True when the chunk exceeds `capacity`. Only a lone block can do that.
    pub fn is_oversized(&self, capacity: f64) -> bool {
        self.cost > capacity + EPSILON
    }
}

/// Partitions `blocks` into ordered, non-empty chunks whose cost stays within `capacity`.
///
/// Total over any input: an empty slice yields no chunks, a non-positive or NaN capacity
/// puts every block in its own chunk, and an infinite capacity never breaks.
pub fn chunk(blocks: &[RepeatableBlock], capacity: f64, model: &CostModel) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = Chunk::new();

    for block in blocks {
        let cost = model.estimate(block);
        let overflows = capacity.is_nan() || current.cost + cost > capacity + EPSILON;

        if overflows && !current.is_empty() {
            chunks.push(std::mem::replace(&mut current, Chunk::new()));
        }

        current.cost += cost;
        current.blocks.push(block.clone());
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
