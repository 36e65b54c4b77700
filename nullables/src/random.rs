//! Nullable random: deterministic random number generation.

use heirloom_types::RandomSource;
use std::sync::Mutex;

/// Returns pre-configured values in order, cycling when exhausted.
pub struct NullRandom {
    outputs: Vec<f64>,
    index: Mutex<usize>,
}

impl NullRandom {
    /// Create with a sequence of deterministic values.
    ///
    /// An empty sequence behaves like `constant(0.0)`.
    pub fn new(outputs: Vec<f64>) -> Self {
        let outputs = if outputs.is_empty() { vec![0.0] } else { outputs };
        Self {
            outputs,
            index: Mutex::new(0),
        }
    }

    /// Create with a single value that will be returned for every call.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        *self.index.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RandomSource for NullRandom {
    fn next_f64(&self) -> f64 {
        let mut idx = self.index.lock().unwrap_or_else(|e| e.into_inner());
        let value = self.outputs[*idx % self.outputs.len()];
        *idx += 1;
        value
    }
}
