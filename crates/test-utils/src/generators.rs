//! Test data generators for creating synthetic ragged structures.
//!
//! These generators create predictable, verifiable replication patterns
//! that can be used across the test suite.

/// Creates ragged replication counts with predictable values.
///
/// Each parent's child count is `(hash(parent, seed) % max_children) + 1`,
/// so every parent has at least one child and the pattern is reproducible
/// for a given seed.
///
/// # Arguments
///
/// * `parents` - Number of parent nodes at this level
/// * `max_children` - Largest child count to generate
/// * `seed` - Seed value for deterministic generation
pub fn ragged_counts(parents: usize, max_children: usize, seed: u32) -> Vec<usize> {
    (0..parents)
        .map(|parent| (simple_hash(parent as u32, 0, seed) as usize % max_children.max(1)) + 1)
        .collect()
}

/// Creates a flat value vector `[1.0, 2.0, ..., n]`.
///
/// Sequential values make it easy to verify that inflation preserved the
/// leaf order: the non-missing cells of the dense output must read
/// `1, 2, 3, ...` in scan order.
pub fn sequential_values(count: usize) -> Vec<f64> {
    (1..=count).map(|value| value as f64).collect()
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}
