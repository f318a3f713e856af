//! The single random source behind every gameplay draw

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform random draws used by spawning, rewards and relocation
pub trait RandomSource {
    /// Uniform value in [0, 1)
    fn unit(&mut self) -> f32;

    /// Uniform value in [min, max); collapses to `min` for an empty range
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.unit() * (max - min).max(0.0)
    }

    /// Uniform index in [0, len); 0 for an empty slice
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.unit() * len as f32) as usize).min(len - 1)
    }

    /// Uniform angle in [0, 2π)
    fn angle(&mut self) -> f32 {
        self.unit() * std::f32::consts::TAU
    }

    /// Uniform integer in [min, max]
    fn int_inclusive(&mut self, min: u32, max: u32) -> u32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = (hi - lo) as f64 + 1.0;
        let offset = (self.unit() as f64 * span) as u64;
        (lo as u64 + offset).min(hi as u64) as u32
    }
}

impl RandomSource for Pcg32 {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Seeded production generator
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of unit values (cycling) for tests
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<f32>,
    pos: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub fn new(values: &[f32]) -> Self {
        Self {
            values: values.to_vec(),
            pos: 0,
        }
    }

    /// Always returns the same value
    pub fn constant(value: f32) -> Self {
        Self::new(&[value])
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRng {
    fn unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}
