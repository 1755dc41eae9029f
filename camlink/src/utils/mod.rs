//! Small helpers shared across the crate.

/// Hex formatting.
pub mod hex;

pub use hex::*;
