//! Value noise source
//!
//! A smooth pseudo-random scalar field: a seeded lattice of uniform values,
//! cosine-interpolated and summed over several octaves. Deterministic for a
//! given seed, output in `[0, 1)`.

use std::f32::consts::PI;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Lattice length (power of two so indices wrap with a mask)
const LATTICE_SIZE: usize = 1 << 12;
const LATTICE_MASK: usize = LATTICE_SIZE - 1;
/// Lattice offset between neighbouring rows of the 2-D field
const ROW_STRIDE: usize = 16;

/// Default number of octaves summed per sample
pub const DEFAULT_OCTAVES: u32 = 4;
/// Default amplitude ratio between successive octaves
pub const DEFAULT_FALLOFF: f32 = 0.5;

/// Seeded multi-octave value noise
#[derive(Debug, Clone)]
pub struct ValueNoise {
    lattice: Box<[f32]>,
    octaves: u32,
    falloff: f32,
}

impl ValueNoise {
    /// Noise with the default detail (4 octaves, falloff 0.5)
    pub fn new(seed: u64) -> Self {
        Self::with_detail(seed, DEFAULT_OCTAVES, DEFAULT_FALLOFF)
    }

    /// Noise with a custom octave count and falloff
    pub fn with_detail(seed: u64, octaves: u32, falloff: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let lattice = (0..LATTICE_SIZE).map(|_| rng.random::<f32>()).collect();
        Self {
            lattice,
            octaves: octaves.max(1),
            falloff: falloff.clamp(0.0, 1.0),
        }
    }

    /// 1-D sample (the `y = 0` row of the 2-D field)
    #[inline]
    pub fn sample1(&self, x: f32) -> f32 {
        self.sample2(x, 0.0)
    }

    /// 2-D sample, mirrored about both axes
    pub fn sample2(&self, x: f32, y: f32) -> f32 {
        let (x, y) = (x.abs(), y.abs());

        let mut xi = x as usize;
        let mut yi = y as usize;
        let mut xf = x - xi as f32;
        let mut yf = y - yi as f32;

        let mut sum = 0.0;
        let mut amplitude = 0.5;

        for _ in 0..self.octaves {
            let base = xi.wrapping_add(yi.wrapping_mul(ROW_STRIDE));
            let (sx, sy) = (fade(xf), fade(yf));

            let top = lerp(self.at(base), self.at(base.wrapping_add(1)), sx);
            let below = base.wrapping_add(ROW_STRIDE);
            let bottom = lerp(self.at(below), self.at(below.wrapping_add(1)), sx);

            sum += lerp(top, bottom, sy) * amplitude;
            amplitude *= self.falloff;

            // Next octave: double the frequency
            xi <<= 1;
            yi <<= 1;
            xf *= 2.0;
            yf *= 2.0;
            if xf >= 1.0 {
                xi = xi.wrapping_add(1);
                xf -= 1.0;
            }
            if yf >= 1.0 {
                yi = yi.wrapping_add(1);
                yf -= 1.0;
            }
        }

        sum
    }

    #[inline]
    fn at(&self, index: usize) -> f32 {
        self.lattice[index & LATTICE_MASK]
    }
}

/// Cosine ease between lattice points
#[inline]
fn fade(t: f32) -> f32 {
    0.5 * (1.0 - (t * PI).cos())
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_deterministic() {
        let a = ValueNoise::new(42);
        let b = ValueNoise::new(42);
        for i in 0..100 {
            let x = i as f32 * 0.37;
            assert_eq!(a.sample2(x, 1.5 * x), b.sample2(x, 1.5 * x));
        }
    }

    #[test]
    fn test_noise_seeds_differ() {
        let a = ValueNoise::new(1);
        let b = ValueNoise::new(2);
        let differs = (0..50).any(|i| a.sample1(i as f32 * 0.5) != b.sample1(i as f32 * 0.5));
        assert!(differs);
    }

    #[test]
    fn test_noise_range() {
        let noise = ValueNoise::new(7);
        for i in -200..200 {
            for j in -20..20 {
                let v = noise.sample2(i as f32 * 0.13, j as f32 * 0.29);
                assert!((0.0..1.0).contains(&v), "sample out of range: {}", v);
            }
        }
    }

    #[test]
    fn test_noise_is_continuous() {
        let noise = ValueNoise::new(3);
        let mut prev = noise.sample2(0.0, 0.4);
        for i in 1..2000 {
            let v = noise.sample2(i as f32 * 1e-3, 0.4);
            assert!((v - prev).abs() < 0.05, "jump at step {}", i);
            prev = v;
        }
    }

    #[test]
    fn test_noise_mirrored() {
        let noise = ValueNoise::new(11);
        assert_eq!(noise.sample2(-3.25, 0.5), noise.sample2(3.25, 0.5));
        assert_eq!(noise.sample2(2.0, -1.75), noise.sample2(2.0, 1.75));
    }

    #[test]
    fn test_noise_handles_large_inputs() {
        let noise = ValueNoise::new(5);
        let v = noise.sample2(-1.0e6, 3.0e5);
        assert!(v.is_finite());
    }
}
