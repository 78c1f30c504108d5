//! Midpoint displacement (diamond-square) subdivision.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::TerrainGenerator;
use crate::error::{TerrainError, ensure_range};
use crate::heightfield::GridMut;
use crate::seed::sample_range;

/// Parameters for [`TerrainGenerator::midpoint_displacement`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidpointParams {
    /// Jitter range for the coarsest pass.
    pub min_height: f32,
    pub max_height: f32,
    /// Exponent controlling how quickly the jitter range shrinks.
    pub roughness: f32,
    /// Base of the per-pass multiplier `dampener_power^(-roughness)`.
    ///
    /// Values below 1 (or negative roughness) grow the jitter each pass.
    pub dampener_power: f32,
}

impl Default for MidpointParams {
    fn default() -> Self {
        Self {
            min_height: -2.0,
            max_height: 2.0,
            roughness: 2.0,
            dampener_power: 2.0,
        }
    }
}

impl MidpointParams {
    pub fn validate(&self) -> Result<(), TerrainError> {
        ensure_range("midpoint.height", self.min_height, self.max_height)?;
        if !self.dampener_power.is_finite() || self.dampener_power <= 0.0 {
            return Err(TerrainError::invalid(
                "midpoint.dampener_power",
                format!("must be positive, got {}", self.dampener_power),
            ));
        }
        if !self.roughness.is_finite() {
            return Err(TerrainError::invalid("midpoint.roughness", "must be finite"));
        }
        Ok(())
    }

    /// Multiplier applied to the jitter range after every pass.
    pub fn dampener(&self) -> f32 {
        self.dampener_power.powf(-self.roughness)
    }
}

/// Set the centre of every `size` square to the mean of its corners plus jitter.
fn square_step<R: Rng>(
    grid: &mut GridMut<'_>,
    rng: &mut R,
    width: usize,
    size: usize,
    lo: f32,
    hi: f32,
) {
    for x in (0..width).step_by(size) {
        for y in (0..width).step_by(size) {
            let cx = x + size;
            let cy = y + size;
            let mx = x + size / 2;
            let my = y + size / 2;

            let mean =
                (grid.get(x, y) + grid.get(x, cy) + grid.get(cx, y) + grid.get(cx, cy)) / 4.0;
            grid.set(mx, my, mean + sample_range(rng, lo, hi));
        }
    }
}

/// Set the four edge midpoints of every `size` square from neighbouring
/// centres and corners.
///
/// A square is skipped entirely when any neighbouring centre offset falls
/// outside the open interval `(0, width - 1)`; coarse passes therefore leave
/// boundary midpoints at their previous value.
fn diamond_step<R: Rng>(
    grid: &mut GridMut<'_>,
    rng: &mut R,
    width: usize,
    size: usize,
    lo: f32,
    hi: f32,
) {
    let w = width as isize;
    let s = size as isize;
    for x in (0..width).step_by(size) {
        for y in (0..width).step_by(size) {
            let cx = x + size;
            let cy = y + size;
            let mx = x + size / 2;
            let my = y + size / 2;

            let right = mx as isize + s;
            let up = my as isize + s;
            let left = mx as isize - s;
            let down = my as isize - s;
            if left <= 0 || right >= w - 1 || down <= 0 || up >= w - 1 {
                continue;
            }
            let (left, right) = (left as usize, right as usize);
            let (up, down) = (up as usize, down as usize);
            let centre = grid.get(mx, my);

            let bottom = (centre + grid.get(cx, y) + grid.get(x, y) + grid.get(mx, down)) / 4.0;
            grid.set(mx, y, bottom + sample_range(rng, lo, hi));

            let top = (centre + grid.get(x, cy) + grid.get(cx, cy) + grid.get(mx, up)) / 4.0;
            grid.set(mx, cy, top + sample_range(rng, lo, hi));

            let west = (centre + grid.get(x, cy) + grid.get(x, y) + grid.get(left, my)) / 4.0;
            grid.set(x, my, west + sample_range(rng, lo, hi));

            let east = (centre + grid.get(cx, cy) + grid.get(cx, y) + grid.get(right, my)) / 4.0;
            grid.set(cx, my, east + sample_range(rng, lo, hi));
        }
    }
}

impl<R: Rng> TerrainGenerator<'_, R> {
    /// Recursive square subdivision over a `(R - 1)`-wide grid.
    ///
    /// The square size starts at `R - 1` and halves (integer division) until
    /// it reaches zero. After each square + diamond pass the jitter range is
    /// multiplied by [`MidpointParams::dampener`].
    ///
    /// The resolution must be `2^n + 1` so every square corner lands on the grid.
    pub fn midpoint_displacement(&mut self, params: &MidpointParams) -> Result<(), TerrainError> {
        params.validate()?;
        let width = self.field.resolution() - 1;
        if !width.is_power_of_two() {
            return Err(TerrainError::invalid(
                "resolution",
                format!("midpoint displacement needs 2^n + 1 cells per side, got {}", width + 1),
            ));
        }

        let dampener = params.dampener();
        let reset = self.reset_before_apply;
        let passes = self.transact(reset, |grid, rng| {
            let mut size = width;
            let mut lo = params.min_height;
            let mut hi = params.max_height;
            let mut passes = 0u32;

            while size > 0 {
                square_step(grid, rng, width, size, lo, hi);
                diamond_step(grid, rng, width, size, lo, hi);
                size /= 2;
                lo *= dampener;
                hi *= dampener;
                passes += 1;
            }
            passes
        })?;

        tracing::debug!(passes, dampener, "applied midpoint displacement");
        Ok(())
    }
}
