//! Uniform per-cell jitter.

use rand::Rng;

use super::TerrainGenerator;
use crate::error::{TerrainError, ensure_range};
use crate::seed::sample_range;

impl<R: Rng> TerrainGenerator<'_, R> {
    /// Add an independent uniform value in `[range[0], range[1]]` to every cell.
    pub fn random_jitter(&mut self, range: [f32; 2]) -> Result<(), TerrainError> {
        let [lo, hi] = range;
        ensure_range("random_range", lo, hi)?;

        let reset = self.reset_before_apply;
        self.transact(reset, |grid, rng| {
            for cell in grid.cells.iter_mut() {
                *cell += sample_range(rng, lo, hi);
            }
        })?;

        tracing::debug!(lo, hi, "applied random jitter");
        Ok(())
    }
}
