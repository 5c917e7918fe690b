//! xorshift64* random number generator
//!
//! This is a fast, high-quality PRNG that is deterministic and suitable
//! for simulation purposes.
//!
//! # Algorithm
//!
//! xorshift64* is a variant of xorshift that passes TestU01's BigCrush
//! statistical tests. It uses 64-bit state and produces 64-bit output.
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers, so a replica can be re-run
//! bit for bit from its seed.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use assembly_line_core::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let range_value = rng.range(0, 100); // [0, 100)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is mapped to 1 (xorshift cannot leave the zero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Get current RNG state
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    ///
    /// # Example
    /// ```
    /// use assembly_line_core::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// let probability = rng.next_f64();
    /// assert!(probability >= 0.0 && probability < 1.0);
    /// ```
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Top 53 bits scaled into [0.0, 1.0)
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Sample from the standard normal distribution (Box-Muller transform)
    ///
    /// Always consumes exactly two uniform draws. The first uniform is
    /// reflected into (0, 1] so the logarithm stays finite.
    pub fn standard_normal(&mut self) -> f64 {
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}
