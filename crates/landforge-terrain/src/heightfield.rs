//! The square elevation grid every generator reads and writes.

use crate::error::TerrainError;

/// A square `R x R` grid of elevations, nominally in `[0, 1]`.
///
/// Values are never clamped: additive generators may push cells outside the
/// nominal range. The resolution is fixed at construction; a terrain that
/// needs a different resolution builds a new `Heightfield`.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightfield {
    resolution: usize,
    /// Row-major elevations, `values[y * resolution + x]`.
    values: Vec<f32>,
}

impl Heightfield {
    /// Smallest accepted resolution. Slope needs a neighbour on every axis.
    pub const MIN_RESOLUTION: usize = 2;

    /// Create a zero-filled heightfield.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] if `resolution < 2`.
    pub fn new(resolution: usize) -> Result<Self, TerrainError> {
        if resolution < Self::MIN_RESOLUTION {
            return Err(TerrainError::invalid(
                "resolution",
                format!("must be at least {}, got {resolution}", Self::MIN_RESOLUTION),
            ));
        }
        Ok(Self {
            resolution,
            values: vec![0.0; resolution * resolution],
        })
    }

    /// Create a heightfield from existing row-major values.
    pub fn from_values(resolution: usize, values: Vec<f32>) -> Result<Self, TerrainError> {
        let mut field = Self::new(resolution)?;
        field.write(values)?;
        Ok(field)
    }

    /// Side length of the grid.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of cells (`R * R`).
    pub fn cell_count(&self) -> usize {
        self.values.len()
    }

    /// Borrow the row-major elevations.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Snapshot of the current grid.
    pub fn read(&self) -> Vec<f32> {
        self.values.clone()
    }

    /// Starting grid for a generator pass: zeros when `reset` is set,
    /// otherwise a copy of the current values.
    pub fn working_copy(&self, reset: bool) -> Vec<f32> {
        if reset {
            vec![0.0; self.values.len()]
        } else {
            self.read()
        }
    }

    /// Replace every stored value at once.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::ResolutionMismatch`] if `values.len() != R * R`.
    pub fn write(&mut self, values: Vec<f32>) -> Result<(), TerrainError> {
        if values.len() != self.values.len() {
            return Err(TerrainError::ResolutionMismatch {
                expected: self.values.len(),
                actual: values.len(),
            });
        }
        self.values = values;
        Ok(())
    }

    /// Replace the whole grid with zeros.
    pub fn reset_to_zero(&mut self) {
        self.values.fill(0.0);
    }

    /// Row-major index of `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is outside the grid.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.resolution && y < self.resolution,
            "cell ({x}, {y}) outside {0}x{0} heightfield",
            self.resolution
        );
        y * self.resolution + x
    }

    /// Elevation at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[self.index(x, y)]
    }

    /// Set the elevation at `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let idx = self.index(x, y);
        self.values[idx] = value;
    }

    /// Lowest and highest elevation in the grid.
    pub fn min_max(&self) -> (f32, f32) {
        self.values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Borrowed row-major view used inside generator hot loops.
///
/// Generators work on a detached `Vec<f32>` so the committed heightfield is
/// never observed half-written; this wrapper gives that vector `(x, y)`
/// addressing.
pub(crate) struct GridMut<'a> {
    pub(crate) resolution: usize,
    pub(crate) cells: &'a mut [f32],
}

impl<'a> GridMut<'a> {
    pub(crate) fn new(resolution: usize, cells: &'a mut [f32]) -> Self {
        debug_assert_eq!(cells.len(), resolution * resolution);
        Self { resolution, cells }
    }

    #[inline]
    pub(crate) fn get(&self, x: usize, y: usize) -> f32 {
        debug_assert!(x < self.resolution && y < self.resolution);
        self.cells[y * self.resolution + x]
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, value: f32) {
        debug_assert!(x < self.resolution && y < self.resolution);
        self.cells[y * self.resolution + x] = value;
    }

    #[inline]
    pub(crate) fn add(&mut self, x: usize, y: usize, delta: f32) {
        debug_assert!(x < self.resolution && y < self.resolution);
        self.cells[y * self.resolution + x] += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero_filled() {
        let field = Heightfield::new(4).unwrap();
        assert_eq!(field.resolution(), 4);
        assert_eq!(field.cell_count(), 16);
        assert!(field.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rejects_tiny_resolution() {
        assert!(Heightfield::new(0).is_err());
        assert!(Heightfield::new(1).is_err());
        assert!(Heightfield::new(2).is_ok());
    }

    #[test]
    fn test_write_requires_matching_size() {
        let mut field = Heightfield::new(3).unwrap();
        let err = field.write(vec![0.0; 4]).unwrap_err();
        assert_eq!(
            err,
            TerrainError::ResolutionMismatch {
                expected: 9,
                actual: 4
            }
        );
        assert!(field.write(vec![0.5; 9]).is_ok());
        assert_eq!(field.get(2, 2), 0.5);
    }

    #[test]
    fn test_working_copy_respects_reset_flag() {
        let field = Heightfield::from_values(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(field.working_copy(false), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(field.working_copy(true), vec![0.0; 4]);
    }

    #[test]
    fn test_get_set_addressing() {
        let mut field = Heightfield::new(3).unwrap();
        field.set(2, 0, 0.75);
        assert_eq!(field.values()[2], 0.75);
        field.set(0, 2, 0.25);
        assert_eq!(field.values()[6], 0.25);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_panics() {
        let field = Heightfield::new(3).unwrap();
        field.get(3, 0);
    }

    #[test]
    fn test_reset_and_min_max() {
        let mut field = Heightfield::from_values(2, vec![-1.0, 0.5, 2.0, 0.0]).unwrap();
        assert_eq!(field.min_max(), (-1.0, 2.0));
        field.reset_to_zero();
        assert_eq!(field.min_max(), (0.0, 0.0));
    }
}
