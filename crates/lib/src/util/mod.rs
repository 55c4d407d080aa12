//! Shared utilities.
//!
//! Hashing for download cache keys and output-tree digests, plus test helpers.

pub mod hash;

#[cfg(test)]
pub mod testutil;
