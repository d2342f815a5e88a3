//! Seeded random source shared by spawning, breeding and body effects.

use glam::Vec3;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::UnitSphere;

/// Random number generator wrapper for genome operations.
///
/// Backed by ChaCha8 so a seed replays the same stream on every platform,
/// which keeps breeding byte-identical across runs.
#[derive(Debug, Clone)]
pub struct GenomeRng {
    rng: ChaCha8Rng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Uniform float in `[0, 1)`.
    #[inline]
    pub fn float(&mut self) -> f32 {
        self.rng.r#gen::<f32>()
    }

    /// True with probability `p`. Probabilities outside `[0, 1]` are clamped.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.float() < p.clamp(0.0, 1.0)
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    #[inline]
    pub fn below(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    /// Random point on the unit sphere.
    pub fn unit_vector3(&mut self) -> Vec3 {
        let [x, y, z]: [f32; 3] = UnitSphere.sample(&mut self.rng);
        Vec3::new(x, y, z)
    }

    /// Generate next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}
