//! Deterministic seeded randomness for the generators.
//!
//! Each generator pass draws from its own stream, derived from the terrain
//! seed and a stream label, so reordering passes in a pipeline does not
//! perturb the random sequence seen by the others.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Derive a u64 seed for a named stream from the terrain seed.
pub fn derive_stream_seed(terrain_seed: u64, stream: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    terrain_seed.hash(&mut hasher);
    stream.hash(&mut hasher);
    hasher.finish()
}

/// Build the RNG for a named stream.
///
/// The same `(terrain_seed, stream)` pair always yields the same sequence.
pub fn terrain_rng(terrain_seed: u64, stream: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_stream_seed(terrain_seed, stream))
}

/// Uniform sample in `[lo, hi)`, or exactly `lo` when the bounds coincide.
///
/// Unlike `random_range`, this never panics on empty or very wide ranges;
/// midpoint displacement can grow its bounds without limit when the
/// dampener amplifies.
#[inline]
pub(crate) fn sample_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * rng.random::<f32>()
}
