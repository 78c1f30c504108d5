//! Neighbourhood-mean smoothing.

use rand::Rng;

use super::TerrainGenerator;
use crate::error::TerrainError;

/// Mean of `(x, y)` and its distinct in-bounds neighbours in `src`.
///
/// Neighbour coordinates are clamped to the grid and deduplicated, so edge
/// and corner cells average over fewer samples.
fn neighbourhood_mean(src: &[f32], r: usize, x: usize, y: usize) -> f32 {
    let x_lo = x.saturating_sub(1);
    let x_hi = (x + 1).min(r - 1);
    let y_lo = y.saturating_sub(1);
    let y_hi = (y + 1).min(r - 1);

    let mut sum = 0.0;
    let mut count = 0u32;
    for ny in y_lo..=y_hi {
        for nx in x_lo..=x_hi {
            sum += src[ny * r + nx];
            count += 1;
        }
    }
    sum / count as f32
}

impl<R: Rng> TerrainGenerator<'_, R> {
    /// Replace each cell with the mean of its 3x3 neighbourhood, `iterations` times.
    ///
    /// Each iteration reads the grid produced by the previous one. Smoothing
    /// always starts from the current elevations; the reset flag is ignored.
    pub fn smooth(&mut self, iterations: u32) -> Result<(), TerrainError> {
        if iterations == 0 {
            return Ok(());
        }

        self.transact(false, |grid, _| {
            let r = grid.resolution;
            let mut src = grid.cells.to_vec();
            for _ in 0..iterations {
                for y in 0..r {
                    for x in 0..r {
                        grid.cells[y * r + x] = neighbourhood_mean(&src, r, x, y);
                    }
                }
                src.copy_from_slice(&*grid.cells);
            }
        })?;

        tracing::debug!(iterations, "smoothed terrain");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightfield::Heightfield;
    use crate::seed::terrain_rng;

    fn bumpy(resolution: usize) -> Heightfield {
        let values = (0..resolution * resolution)
            .map(|i| ((i * 37) % 11) as f32 * 0.1)
            .collect();
        Heightfield::from_values(resolution, values).unwrap()
    }

    #[test]
    fn test_zero_iterations_is_noop() {
        let mut field = bumpy(6);
        let before = field.read();
        let mut rng = terrain_rng(0, "smooth");
        TerrainGenerator::new(&mut field, &mut rng, true).smooth(0).unwrap();
        assert_eq!(field.read(), before);
    }

    #[test]
    fn test_interior_cells_within_original_neighbourhood() {
        let mut field = bumpy(8);
        let original = field.clone();
        let mut rng = terrain_rng(0, "smooth");
        TerrainGenerator::new(&mut field, &mut rng, false).smooth(1).unwrap();

        for y in 1..7 {
            for x in 1..7 {
                let mut lo = f32::INFINITY;
                let mut hi = f32::NEG_INFINITY;
                for ny in y - 1..=y + 1 {
                    for nx in x - 1..=x + 1 {
                        lo = lo.min(original.get(nx, ny));
                        hi = hi.max(original.get(nx, ny));
                    }
                }
                let v = field.get(x, y);
                assert!(
                    v >= lo - 1e-6 && v <= hi + 1e-6,
                    "({x}, {y}) = {v} outside [{lo}, {hi}]"
                );
            }
        }
    }

    #[test]
    fn test_corner_averages_four_cells() {
        let mut values = vec![0.0; 9];
        values[0] = 1.0;
        let mut field = Heightfield::from_values(3, values).unwrap();
        let mut rng = terrain_rng(0, "smooth");
        TerrainGenerator::new(&mut field, &mut rng, false).smooth(1).unwrap();
        assert!((field.get(0, 0) - 0.25).abs() < 1e-6);
        assert!((field.get(1, 0) - 1.0 / 6.0).abs() < 1e-6);
        assert!((field.get(1, 1) - 1.0 / 9.0).abs() < 1e-6);
        assert_eq!(field.get(2, 2), 0.0);
    }

    #[test]
    fn test_iterations_compound() {
        let mut once_twice = bumpy(5);
        let mut rng = terrain_rng(0, "smooth");
        {
            let mut generator = TerrainGenerator::new(&mut once_twice, &mut rng, false);
            generator.smooth(1).unwrap();
            generator.smooth(1).unwrap();
        }
        let mut twice = bumpy(5);
        TerrainGenerator::new(&mut twice, &mut rng, false).smooth(2).unwrap();
        assert_eq!(once_twice.read(), twice.read());
    }

    #[test]
    fn test_smoothing_ignores_reset_flag() {
        let mut field = Heightfield::from_values(2, vec![1.0; 4]).unwrap();
        let mut rng = terrain_rng(0, "smooth");
        TerrainGenerator::new(&mut field, &mut rng, true).smooth(3).unwrap();
        assert!(field.values().iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }
}
