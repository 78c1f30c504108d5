//! Smooth 2D value noise and its multi-octave fractal combinator.
//!
//! Both functions are pure: the underlying Perlin permutation table is built
//! once from a fixed seed and never mutated, so identical inputs always give
//! identical outputs across calls and threads.

use std::sync::LazyLock;

use noise::{NoiseFn, Perlin};

/// Seed of the shared permutation table. Changing it changes every terrain.
const KERNEL_SEED: u32 = 0;

static KERNEL: LazyLock<Perlin> = LazyLock::new(|| Perlin::new(KERNEL_SEED));

/// Sample continuous Perlin noise at `(x, y)`, remapped to `[0, 1]`.
pub fn smooth_noise_2d(x: f32, y: f32) -> f32 {
    let raw = KERNEL.get([x as f64, y as f64]);
    (((raw + 1.0) * 0.5) as f32).clamp(0.0, 1.0)
}

/// Fractal Brownian motion over [`smooth_noise_2d`].
///
/// Each octave doubles the frequency and multiplies the amplitude by
/// `persistence`, starting from 1. The sum is divided by the total amplitude
/// used, keeping the result in `[0, 1]`. Persistence above 1 is accepted and
/// makes higher octaves dominate.
///
/// Callers validate `octaves >= 1` and `persistence > 0` up front; with zero
/// octaves the result would be `0 / 0`.
pub fn fractal_noise(x: f32, y: f32, octaves: u32, persistence: f32) -> f32 {
    let mut total = 0.0;
    let mut frequency = 1.0;
    let mut amplitude = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += smooth_noise_2d(x * frequency, y * frequency) * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }

    total / max_value
}
