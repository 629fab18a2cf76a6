//! Flare texture synthesizer
//!
//! Each frame a noise pass paints a disc of animated grey rings into the
//! visible buffer, then a 5x5 box blur reads that buffer and writes the other
//! slot, which becomes visible. Texels neither pass touches (outside the disc,
//! within the blur border) keep their previous value.

use std::f32::consts::TAU;

use super::noise::ValueNoise;
use super::sprite::{Texel, TexelGrid};
use crate::consts::{FLARE_BLUR_RADIUS, FLARE_RADIUS_FRACTION, FLARE_SEED_STEP};

/// Double-buffered flare overlay for one body
#[derive(Debug, Clone)]
pub struct FlareTexture {
    buffers: [TexelGrid; 2],
    front: usize,
    noise_seed: f32,
    radius: f32,
}

impl FlareTexture {
    /// Transparent flare buffers sized `6 × radius`
    pub fn new(radius: f32, noise_seed: f32) -> Self {
        let side = (6.0 * radius) as usize;
        Self {
            buffers: [TexelGrid::new(side), TexelGrid::new(side)],
            front: 0,
            noise_seed,
            radius,
        }
    }

    /// The currently visible buffer
    #[inline]
    pub fn visible(&self) -> &TexelGrid {
        &self.buffers[self.front]
    }

    #[inline]
    pub fn noise_seed(&self) -> f32 {
        self.noise_seed
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Advance the animation by one frame
    pub fn evolve(&mut self, noise: &ValueNoise) {
        self.noise_pass(noise);
        self.smooth_pass();
    }

    /// Paint noise into the visible buffer inside `0.9 × radius` of the centre
    pub(crate) fn noise_pass(&mut self, noise: &ValueNoise) {
        self.noise_seed += FLARE_SEED_STEP;

        let seed = self.noise_seed;
        let limit = FLARE_RADIUS_FRACTION * self.radius;
        let grid = &mut self.buffers[self.front];
        let side = grid.side();
        let c = grid.center();

        for y in 0..side {
            for x in 0..side {
                let dx = x as f32 - c;
                let dy = y as f32 - c;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist >= limit {
                    continue;
                }

                // Jitter the angle per column so rings break into flares
                let angle = (dy.atan2(dx) + noise.sample1(x as f32)) / TAU;
                let value = noise.sample2(0.1 * (dist - seed), 3.0 * angle);
                grid.set(x, y, Texel::new((255.0 * value) as u8, 255));
            }
        }
    }

    /// Box-blur the visible buffer into the back slot and flip
    pub(crate) fn smooth_pass(&mut self) {
        let back = 1 - self.front;
        let (first, second) = self.buffers.split_at_mut(1);
        let (src, dst) = if self.front == 0 {
            (&first[0], &mut second[0])
        } else {
            (&second[0], &mut first[0])
        };
        assert_eq!(src.side(), dst.side(), "flare buffers differ in size");

        // Texels the blur does not write carry over
        dst.copy_from(src);

        let side = src.side();
        let k = FLARE_BLUR_RADIUS;
        let window = ((2 * k + 1) * (2 * k + 1)) as u32;

        for y in k..side.saturating_sub(k) {
            for x in k..side.saturating_sub(k) {
                let mut sum = 0u32;
                for ny in y - k..=y + k {
                    for nx in x - k..=x + k {
                        sum += src.get(nx, ny).grey as u32;
                    }
                }
                let mean = (sum / window) as u8;
                dst.set(x, y, Texel::new(mean, mean));
            }
        }

        self.front = back;
    }
}
