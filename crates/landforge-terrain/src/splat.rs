//! Texture-weight (splat) map composition from height and slope bands.

use crate::error::TerrainError;
use crate::heightfield::Heightfield;
use crate::kernel::smooth_noise_2d;
use crate::layers::{LayerList, SplatLayerParams};
use crate::surface::{nearest_cell, slope_at};

/// Per-cell layer weights, indexed `[x, y, layer]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SplatMap {
    width: usize,
    height: usize,
    layers: usize,
    weights: Vec<f32>,
}

impl SplatMap {
    fn zeroed(width: usize, height: usize, layers: usize) -> Self {
        Self {
            width,
            height,
            layers,
            weights: vec![0.0; width * height * layers],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of channels, equal to the layer list length.
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Weight vector of the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the map.
    pub fn weights(&self, x: usize, y: usize) -> &[f32] {
        assert!(x < self.width && y < self.height, "splat cell ({x}, {y}) out of range");
        let start = (y * self.width + x) * self.layers;
        &self.weights[start..start + self.layers]
    }

    /// Single weight at `[x, y, layer]`.
    pub fn get(&self, x: usize, y: usize, layer: usize) -> f32 {
        self.weights(x, y)[layer]
    }

    fn weights_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        let start = (y * self.width + x) * self.layers;
        &mut self.weights[start..start + self.layers]
    }
}

/// Scale `weights` so they sum to 1.
///
/// A cell that matched no layer keeps all weights at 0 rather than dividing
/// by zero.
fn normalize(weights: &mut [f32]) {
    let sum: f32 = weights.iter().sum();
    if sum <= 0.0 {
        return;
    }
    for w in weights.iter_mut() {
        *w /= sum;
    }
}

/// Whether the alphamap cell `(x, y)` with the given terrain height and slope
/// falls inside `layer`'s noise-jittered bands.
fn layer_matches(layer: &SplatLayerParams, x: usize, y: usize, height: f32, slope: f32) -> bool {
    let noise = smooth_noise_2d(x as f32 * layer.noise_x_scale, y as f32 * layer.noise_y_scale)
        * layer.noise_scaler;
    let offset = layer.splat_offset + noise;
    let height_ok = height >= layer.min_height - offset && height <= layer.max_height + offset;
    let slope_ok = slope >= layer.min_slope && slope <= layer.max_slope;
    height_ok && slope_ok
}

/// Build a normalized weight map of `alpha_resolution x alpha_resolution` cells.
///
/// Alphamap cells address the heightfield through normalized coordinates, so
/// the two resolutions need not match. Each layer contributes weight 1 where
/// its bands match and 0 elsewhere; the vector is then normalized per cell.
///
/// # Errors
///
/// Returns [`TerrainError::InvalidParameter`] if `alpha_resolution < 2` or
/// any layer has an inverted band.
pub fn compose_splat_map(
    field: &Heightfield,
    layers: &LayerList<SplatLayerParams>,
    alpha_resolution: usize,
) -> Result<SplatMap, TerrainError> {
    if alpha_resolution < 2 {
        return Err(TerrainError::invalid(
            "alpha_resolution",
            format!("must be at least 2, got {alpha_resolution}"),
        ));
    }
    for layer in layers {
        layer.validate()?;
    }

    let r = field.resolution();
    let span = (alpha_resolution - 1) as f32;
    let mut map = SplatMap::zeroed(alpha_resolution, alpha_resolution, layers.len());
    let mut unmatched = 0usize;

    for y in 0..alpha_resolution {
        let hy = nearest_cell(y as f32 / span, r);
        for x in 0..alpha_resolution {
            let hx = nearest_cell(x as f32 / span, r);
            let height = field.get(hx, hy);
            let slope = slope_at(field, hx, hy);

            let cell = map.weights_mut(x, y);
            for (i, layer) in layers.iter().enumerate() {
                if layer_matches(layer, x, y, height, slope) {
                    cell[i] = 1.0;
                }
            }
            if cell.iter().all(|&w| w == 0.0) {
                unmatched += 1;
            }
            normalize(cell);
        }
    }

    tracing::debug!(
        resolution = alpha_resolution,
        layers = layers.len(),
        unmatched,
        "composed splat map"
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(min_height: f32, max_height: f32) -> SplatLayerParams {
        SplatLayerParams {
            min_height,
            max_height,
            min_slope: 0.0,
            max_slope: 10.0,
            splat_offset: 0.0,
            noise_scaler: 0.0,
            ..Default::default()
        }
    }

    fn gradient_field(resolution: usize) -> Heightfield {
        let values = (0..resolution * resolution)
            .map(|i| (i % resolution) as f32 / (resolution - 1) as f32)
            .collect();
        Heightfield::from_values(resolution, values).unwrap()
    }

    #[test]
    fn test_weights_sum_to_one_where_matched() {
        let field = gradient_field(9);
        let mut layers = LayerList::new(band(0.0, 0.6));
        layers.add(band(0.4, 1.0));
        layers.add(band(0.2, 0.8));
        let map = compose_splat_map(&field, &layers, 9).unwrap();

        assert_eq!(map.layers(), 3);
        for y in 0..9 {
            for x in 0..9 {
                let sum: f32 = map.weights(x, y).iter().sum();
                assert!((sum - 1.0).abs() < 1e-6, "cell ({x}, {y}) sums to {sum}");
            }
        }
    }

    #[test]
    fn test_overlapping_layers_share_weight() {
        let field = Heightfield::from_values(2, vec![0.5; 4]).unwrap();
        let mut layers = LayerList::new(band(0.0, 1.0));
        layers.add(band(0.4, 0.6));
        let map = compose_splat_map(&field, &layers, 2).unwrap();
        assert_eq!(map.weights(0, 0), &[0.5, 0.5]);
    }

    #[test]
    fn test_unmatched_cells_stay_zero() {
        let field = Heightfield::from_values(3, vec![0.9; 9]).unwrap();
        let layers = LayerList::new(band(0.0, 0.1));
        let map = compose_splat_map(&field, &layers, 4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let w = map.get(x, y, 0);
                assert_eq!(w, 0.0);
                assert!(!w.is_nan());
            }
        }
    }

    #[test]
    fn test_slope_band_excludes_steep_cells() {
        let field = gradient_field(5);
        let mut flat_only = band(0.0, 1.0);
        flat_only.max_slope = 0.1;
        let layers = LayerList::new(flat_only);
        let map = compose_splat_map(&field, &layers, 5).unwrap();
        // The gradient rises 0.25 per cell, which exceeds the slope band.
        assert_eq!(map.get(2, 2, 0), 0.0);
    }

    #[test]
    fn test_splat_offset_widens_height_band() {
        let field = Heightfield::from_values(2, vec![0.25; 4]).unwrap();
        let mut layer = band(0.3, 0.4);
        let narrow = compose_splat_map(&field, &LayerList::new(layer.clone()), 2).unwrap();
        assert_eq!(narrow.get(0, 0, 0), 0.0);

        layer.splat_offset = 0.1;
        let wide = compose_splat_map(&field, &LayerList::new(layer), 2).unwrap();
        assert_eq!(wide.get(0, 0, 0), 1.0);
    }

    #[test]
    fn test_alphamap_resolution_may_differ() {
        let field = gradient_field(17);
        let layers = LayerList::new(band(0.0, 1.0));
        let map = compose_splat_map(&field, &layers, 5).unwrap();
        assert_eq!((map.width(), map.height()), (5, 5));
        assert_eq!(map.get(4, 4, 0), 1.0);
    }

    #[test]
    fn test_tiny_alphamap_rejected() {
        let field = gradient_field(3);
        let layers = LayerList::new(band(0.0, 1.0));
        assert!(compose_splat_map(&field, &layers, 1).is_err());
    }
}
