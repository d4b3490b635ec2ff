//! Entropy sources
//!
//! Every sampler in the workspace draws its randomness through
//! [`EntropySource`] so that a cycle can be replayed exactly from a seed.

/// A source of uniform draws in `[0, 1)`.
pub trait EntropySource {
    /// Next uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform value in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_f64() * (high - low)
    }

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }

    /// Uniform integer in `[low, high)`. Returns `low` for an empty range.
    fn range_u32(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        low + self.index((high - low) as usize) as u32
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

impl<E: EntropySource + ?Sized> EntropySource for &mut E {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl<E: EntropySource + ?Sized> EntropySource for Box<E> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Reproducible source backed by a seeded `fastrand` generator.
#[derive(Debug, Clone)]
pub struct SeededEntropy {
    rng: fastrand::Rng,
    seed: u64,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl EntropySource for SeededEntropy {
    fn next_f64(&mut self) -> f64 {
        self.rng.f64()
    }
}

/// Production source seeded from the operating system.
#[derive(Debug, Clone)]
pub struct SystemEntropy {
    rng: fastrand::Rng,
}

impl SystemEntropy {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }
}

impl Default for SystemEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for SystemEntropy {
    fn next_f64(&mut self) -> f64 {
        self.rng.f64()
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
///
/// Used to drive samplers into hand-picked corners (e.g. a guaranteed
/// settlement win). Values are clamped into `[0, 1)`.
#[derive(Debug, Clone)]
pub struct ScriptedEntropy {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedEntropy {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// A source that always yields `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl EntropySource for ScriptedEntropy {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
