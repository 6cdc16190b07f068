use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of every random draw the emulator makes. Both bounds are inclusive.
pub trait RandomSource {
    fn uniform(&mut self, low: f32, high: f32) -> f32;
    fn byte_between(&mut self, low: u8, high: u8) -> u8;
}

/// Default source backed by `StdRng`.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, low: f32, high: f32) -> f32 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn byte_between(&mut self, low: u8, high: u8) -> u8 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}

/// Replays fixed values, for exact-byte tests and reproducible demos.
///
/// Each draw pops the next queued value and clamps it into the requested
/// range. An exhausted queue yields the lower bound.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    uniforms: VecDeque<f32>,
    bytes: VecDeque<u8>,
}

impl ScriptedRandom {
    pub fn new(uniforms: Vec<f32>, bytes: Vec<u8>) -> Self {
        Self {
            uniforms: uniforms.into(),
            bytes: bytes.into(),
        }
    }

    pub fn push_uniform(&mut self, value: f32) {
        self.uniforms.push_back(value);
    }

    pub fn push_byte(&mut self, value: u8) {
        self.bytes.push_back(value);
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self, low: f32, high: f32) -> f32 {
        match self.uniforms.pop_front() {
            Some(value) => value.clamp(low, high.max(low)),
            None => low,
        }
    }

    fn byte_between(&mut self, low: u8, high: u8) -> u8 {
        match self.bytes.pop_front() {
            Some(value) => value.clamp(low, high.max(low)),
            None => low,
        }
    }
}
