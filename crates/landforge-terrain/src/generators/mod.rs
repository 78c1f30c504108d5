//! Elevation generators.
//!
//! Every operation follows the same transaction: take a working copy of the
//! grid (zeros when `reset_before_apply` is set), mutate it cell by cell, and
//! commit the whole copy back. Parameters are validated before the copy is
//! taken, so a rejected call leaves the heightfield untouched.

mod image;
mod midpoint;
mod noise;
mod peaks;
mod random;
mod smooth;

pub use self::image::HeightImage;
pub use midpoint::MidpointParams;
pub use peaks::{PeakParams, VoronoiKind};

use rand::Rng;

use crate::error::TerrainError;
use crate::heightfield::{GridMut, Heightfield};

/// Runs generator passes against one heightfield with an explicit RNG.
///
/// Holds a mutable borrow of the heightfield for its whole lifetime, so no
/// other code can observe or modify the grid while passes are applied.
pub struct TerrainGenerator<'a, R: Rng> {
    field: &'a mut Heightfield,
    rng: &'a mut R,
    reset_before_apply: bool,
}

impl<'a, R: Rng> TerrainGenerator<'a, R> {
    /// Create a generator over `field`.
    ///
    /// With `reset_before_apply` set, additive passes start from a zero grid
    /// instead of the current elevations.
    pub fn new(field: &'a mut Heightfield, rng: &'a mut R, reset_before_apply: bool) -> Self {
        Self {
            field,
            rng,
            reset_before_apply,
        }
    }

    /// Borrow the heightfield being generated.
    pub fn field(&self) -> &Heightfield {
        self.field
    }

    /// Replace the whole grid with zeros.
    pub fn reset(&mut self) {
        self.field.reset_to_zero();
        tracing::debug!(resolution = self.field.resolution(), "terrain reset");
    }

    /// Run `pass` over a working copy and commit the result.
    fn transact<T>(
        &mut self,
        reset: bool,
        pass: impl FnOnce(&mut GridMut<'_>, &mut R) -> T,
    ) -> Result<T, TerrainError> {
        let resolution = self.field.resolution();
        let mut cells = self.field.working_copy(reset);
        let out = {
            let mut grid = GridMut::new(resolution, &mut cells);
            pass(&mut grid, &mut *self.rng)
        };
        self.field.write(cells)?;
        Ok(out)
    }
}
