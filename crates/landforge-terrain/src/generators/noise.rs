//! Single and layered fractal-noise heights.

use rand::Rng;

use super::TerrainGenerator;
use crate::error::TerrainError;
use crate::heightfield::GridMut;
use crate::kernel::fractal_noise;
use crate::layers::{LayerList, NoiseLayerParams};

fn add_noise_layer(grid: &mut GridMut<'_>, p: &NoiseLayerParams) {
    for y in 0..grid.resolution {
        for x in 0..grid.resolution {
            let nx = (x as f32 + p.x_offset as f32) * p.x_scale;
            let ny = (y as f32 + p.y_offset as f32) * p.y_scale;
            grid.add(x, y, fractal_noise(nx, ny, p.octaves, p.persistence) * p.height_scale);
        }
    }
}

impl<R: Rng> TerrainGenerator<'_, R> {
    /// Add one fractal-noise layer to every cell.
    pub fn single_noise(&mut self, params: &NoiseLayerParams) -> Result<(), TerrainError> {
        params.validate()?;

        let reset = self.reset_before_apply;
        self.transact(reset, |grid, _| add_noise_layer(grid, params))?;

        tracing::debug!(
            octaves = params.octaves,
            persistence = params.persistence,
            "applied single noise layer"
        );
        Ok(())
    }

    /// Add the sum of every layer in `layers` to every cell.
    ///
    /// All layers are validated before any is applied.
    pub fn layered_noise(&mut self, layers: &LayerList<NoiseLayerParams>) -> Result<(), TerrainError> {
        for layer in layers {
            layer.validate()?;
        }

        let reset = self.reset_before_apply;
        self.transact(reset, |grid, _| {
            for layer in layers {
                add_noise_layer(grid, layer);
            }
        })?;

        tracing::debug!(layers = layers.len(), "applied layered noise");
        Ok(())
    }
}
