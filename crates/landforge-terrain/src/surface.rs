//! Slope classification and the terrain-host capability used by placement.

use glam::Vec3;

use crate::heightfield::Heightfield;

/// Forward-difference gradient magnitude at `(x, y)`.
///
/// At the far edge of each axis the neighbour index falls back to `x - 1`
/// (resp. `y - 1`), so the last row and column use a backward difference.
///
/// # Panics
///
/// Panics if `(x, y)` lies outside the grid.
pub fn slope_at(field: &Heightfield, x: usize, y: usize) -> f32 {
    let r = field.resolution();
    let h = field.get(x, y);
    let nx = if x + 1 > r - 1 { x - 1 } else { x + 1 };
    let ny = if y + 1 > r - 1 { y - 1 } else { y + 1 };

    let dx = field.get(nx, y) - h;
    let dy = field.get(x, ny) - h;
    (dx * dx + dy * dy).sqrt()
}

/// Map a normalized coordinate in `[0, 1]` to the nearest cell index.
#[inline]
pub(crate) fn nearest_cell(t: f32, resolution: usize) -> usize {
    let max = (resolution - 1) as f32;
    (t * max).round().clamp(0.0, max) as usize
}

/// World-facing queries a terrain host answers for scatter placement.
///
/// An engine would back this with its own terrain object and physics
/// raycasts; [`HeightfieldSurface`] implements it directly over a grid.
pub trait TerrainSurface {
    /// World-space extent: `x` width, `y` height scale, `z` length.
    fn size(&self) -> Vec3;

    /// Surface height in world units at a world-space `(x, z)`.
    fn height_at(&self, world_x: f32, world_z: f32) -> f32;

    /// Steepness at normalized `(u, v)` coordinates.
    fn slope_at(&self, u: f32, v: f32) -> f32;

    /// Probe vertically at a world-space `(x, z)`. `None` means the probe
    /// missed the surface and nothing should be placed there.
    fn probe_surface_height(&self, world_x: f32, world_z: f32) -> Option<f32>;
}

/// [`TerrainSurface`] backed by a borrowed [`Heightfield`].
pub struct HeightfieldSurface<'a> {
    field: &'a Heightfield,
    size: Vec3,
}

impl<'a> HeightfieldSurface<'a> {
    /// Wrap `field` spanning `size` world units.
    pub fn new(field: &'a Heightfield, size: Vec3) -> Self {
        Self { field, size }
    }

    /// Bilinear sample of the grid at normalized `(u, v)`, clamped to the edges.
    fn sample(&self, u: f32, v: f32) -> f32 {
        let max = (self.field.resolution() - 1) as f32;
        let fx = (u * max).clamp(0.0, max);
        let fy = (v * max).clamp(0.0, max);
        let x0 = fx.floor() as usize;
        let y0 = fy.floor() as usize;
        let x1 = (x0 + 1).min(self.field.resolution() - 1);
        let y1 = (y0 + 1).min(self.field.resolution() - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let top = self.field.get(x0, y0) * (1.0 - tx) + self.field.get(x1, y0) * tx;
        let bottom = self.field.get(x0, y1) * (1.0 - tx) + self.field.get(x1, y1) * tx;
        top * (1.0 - ty) + bottom * ty
    }
}

impl TerrainSurface for HeightfieldSurface<'_> {
    fn size(&self) -> Vec3 {
        self.size
    }

    fn height_at(&self, world_x: f32, world_z: f32) -> f32 {
        self.sample(world_x / self.size.x, world_z / self.size.z) * self.size.y
    }

    fn slope_at(&self, u: f32, v: f32) -> f32 {
        let r = self.field.resolution();
        slope_at(self.field, nearest_cell(u, r), nearest_cell(v, r))
    }

    fn probe_surface_height(&self, world_x: f32, world_z: f32) -> Option<f32> {
        let inside = (0.0..=self.size.x).contains(&world_x) && (0.0..=self.size.z).contains(&world_z);
        inside.then(|| self.height_at(world_x, world_z))
    }
}
