//! Scatter placement of vegetation and props across the terrain footprint.

use glam::{Vec3, Vec4};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::layers::{LayerList, VegetationLayerParams};
use crate::seed::sample_range;
use crate::surface::TerrainSurface;

/// Horizontal jitter applied to each candidate, in world units.
const POSITION_JITTER: f32 = 0.5;

/// A placed prototype instance, ready for an external renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedInstance {
    /// Position normalized to the terrain bounds, each axis in `[0, 1]`.
    pub position: Vec3,
    /// Rotation around the vertical axis, in degrees.
    pub rotation: f32,
    /// Index into the vegetation layer list.
    pub prototype_index: usize,
    pub color: Vec4,
    pub lightmap_color: Vec4,
    pub width_scale: f32,
    pub height_scale: f32,
}

/// Global placement settings shared by every prototype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterParams {
    /// Hard cap on the number of instances produced.
    pub max_instances: usize,
    /// Grid step across the footprint, in world units.
    pub spacing: u32,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            max_instances: 5000,
            spacing: 5,
        }
    }
}

/// Place instances on `surface` according to `layers`.
///
/// The footprint is walked in `spacing` steps along x and z. At each step the
/// prototypes are visited in list order; a uniform draw at or above a
/// prototype's `density` abandons the remaining prototypes at that step, so
/// density acts as a sequential gate rather than an independent coin flip.
/// A prototype whose height and slope bands match produces a jittered
/// candidate that is snapped to the surface by a vertical probe; candidates
/// the probe misses are dropped. Placement stops as soon as
/// `params.max_instances` instances exist.
///
/// # Errors
///
/// Returns [`TerrainError::InvalidParameter`] for a zero spacing, a
/// non-positive terrain size, or an invalid layer.
pub fn scatter<R: Rng + ?Sized>(
    surface: &impl TerrainSurface,
    layers: &LayerList<VegetationLayerParams>,
    params: &ScatterParams,
    rng: &mut R,
) -> Result<Vec<PlacedInstance>, TerrainError> {
    if params.spacing == 0 {
        return Err(TerrainError::invalid("spacing", "must be at least 1"));
    }
    let size = surface.size();
    if !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0) {
        return Err(TerrainError::invalid(
            "terrain_size",
            format!("every axis must be positive, got {size}"),
        ));
    }
    for layer in layers {
        layer.validate()?;
    }

    let mut placed = Vec::new();
    if params.max_instances == 0 {
        return Ok(placed);
    }

    let steps_x = size.x.ceil() as u32;
    let steps_z = size.z.ceil() as u32;
    let step = params.spacing as usize;

    'footprint: for z in (0..steps_z).step_by(step) {
        for x in (0..steps_x).step_by(step) {
            let (wx, wz) = (x as f32, z as f32);
            for (index, layer) in layers.iter().enumerate() {
                if rng.random::<f32>() >= layer.density {
                    break;
                }

                let height = surface.height_at(wx, wz) / size.y;
                let slope = surface.slope_at(wx / size.x, wz / size.z);
                let in_height = height >= layer.min_height && height <= layer.max_height;
                let in_slope = slope >= layer.min_slope && slope <= layer.max_slope;
                if !(in_height && in_slope) {
                    continue;
                }

                let jx = wx + sample_range(rng, -POSITION_JITTER, POSITION_JITTER);
                let jz = wz + sample_range(rng, -POSITION_JITTER, POSITION_JITTER);
                let Some(surface_height) = surface.probe_surface_height(jx, jz) else {
                    tracing::trace!(x = jx, z = jz, "surface probe missed");
                    continue;
                };

                let scale = sample_range(rng, layer.min_scale, layer.max_scale);
                let tint = rng.random::<f32>();
                placed.push(PlacedInstance {
                    position: Vec3::new(jx / size.x, surface_height / size.y, jz / size.z),
                    rotation: sample_range(rng, layer.min_rotation, layer.max_rotation),
                    prototype_index: index,
                    color: layer.color1.lerp(layer.color2, tint),
                    lightmap_color: layer.lightmap_color,
                    width_scale: scale,
                    height_scale: scale,
                });

                if placed.len() >= params.max_instances {
                    break 'footprint;
                }
            }
        }
    }

    tracing::debug!(
        placed = placed.len(),
        cap = params.max_instances,
        prototypes = layers.len(),
        "scattered instances"
    );
    Ok(placed)
}
