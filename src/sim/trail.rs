//! Bounded history of a body's positions

use std::collections::VecDeque;

use glam::DVec3;

use crate::consts::{TRAIL_CAPACITY, TRAIL_DECIMATION, TRAIL_TAIL_SKIP};

/// FIFO of sampled positions, oldest first
///
/// Only every `TRAIL_DECIMATION`-th offered position is kept, and the oldest
/// sample is evicted once `TRAIL_CAPACITY` is exceeded.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<DVec3>,
    counter: u32,
}

impl Default for Trail {
    fn default() -> Self {
        Self::new()
    }
}

impl Trail {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(TRAIL_CAPACITY + 1),
            counter: 0,
        }
    }

    /// Offer the position reached after an advance; returns true if it was sampled
    pub fn record(&mut self, pos: DVec3) -> bool {
        self.counter += 1;
        if self.counter < TRAIL_DECIMATION {
            return false;
        }
        self.counter = 0;

        self.points.push_back(pos);
        if self.points.len() > TRAIL_CAPACITY {
            self.points.pop_front();
        }
        true
    }

    /// Drop every sample (the decimation phase is kept)
    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Samples, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &DVec3> {
        self.points.iter()
    }

    /// Consecutive sample pairs to draw
    ///
    /// The newest `TRAIL_TAIL_SKIP` samples sit under the body sprite and are
    /// left out; a trail with no more samples than that draws nothing.
    pub fn segments(&self) -> impl Iterator<Item = (DVec3, DVec3)> + '_ {
        let visible = self.points.len().saturating_sub(TRAIL_TAIL_SKIP);
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .take(visible)
            .map(|(a, b)| (*a, *b))
    }
}
