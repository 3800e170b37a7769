//! Random sample streams with request/consumption bookkeeping.
//!
//! A consumer announces how many samples of which dimension it is about to
//! draw (`split_in_place`) or asks for an independent child stream (`split`).
//! Drawing more than announced is a bug caught in debug builds.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shadekit_math::Vec2;

/// Deterministic stream of uniform samples in [0, 1).
#[derive(Clone, Debug)]
pub struct SamplingContext {
    rng: StdRng,
    dimension: usize,
    sample_count: usize,
    consumed: usize,
}

impl SamplingContext {
    /// Create a stream from a seed. Equal seeds yield equal streams.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            dimension: 0,
            sample_count: 0,
            consumed: 0,
        }
    }

    /// Announce that `sample_count` samples of `dimension` will be drawn
    /// from this stream.
    pub fn split_in_place(&mut self, dimension: usize, sample_count: usize) {
        self.dimension = dimension;
        self.sample_count = sample_count;
        self.consumed = 0;
    }

    /// Derive an independent child stream for `sample_count` samples of
    /// `dimension`. The parent advances by one draw.
    pub fn split(&mut self, dimension: usize, sample_count: usize) -> SamplingContext {
        let mut child = SamplingContext::new(self.rng.gen());
        child.split_in_place(dimension, sample_count);
        child
    }

    /// Draw the next 2D sample.
    pub fn next2(&mut self) -> Vec2 {
        debug_assert_eq!(self.dimension, 2, "next2() on a stream split for dimension {}", self.dimension);
        debug_assert!(
            self.consumed < self.sample_count,
            "sampling context exhausted after {} samples",
            self.sample_count
        );
        self.consumed += 1;
        Vec2::new(self.rng.gen(), self.rng.gen())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Samples announced but not drawn yet.
    pub fn remaining(&self) -> usize {
        self.sample_count.saturating_sub(self.consumed)
    }
}
