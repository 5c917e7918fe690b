//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm. Every replica owns exactly one
//! `RngManager`, seeded `base_seed + replica_index`.
//! CRITICAL: All randomness in the simulator MUST go through this module.

mod draws;
mod xorshift;

pub use xorshift::RngManager;
