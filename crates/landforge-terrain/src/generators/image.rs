//! Heights sampled from a source image.

use ::image::{GrayImage, RgbaImage};
use glam::Vec3;
use glam::Vec4;
use rand::Rng;

use super::TerrainGenerator;
use crate::error::TerrainError;

/// A 2D grid of color samples addressable by integer pixel coordinate.
pub trait HeightImage {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// RGBA at `(px, py)` with components in `[0, 1]`.
    ///
    /// Callers only pass coordinates inside the image.
    fn pixel(&self, px: u32, py: u32) -> Vec4;

    /// Luminance at `(px, py)` in `[0, 1]`.
    fn grayscale(&self, px: u32, py: u32) -> f32 {
        let c = self.pixel(px, py);
        0.299 * c.x + 0.587 * c.y + 0.114 * c.z
    }
}

impl HeightImage for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn pixel(&self, px: u32, py: u32) -> Vec4 {
        let p = self.get_pixel(px, py).0;
        Vec4::new(p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32) / 255.0
    }
}

impl HeightImage for GrayImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn pixel(&self, px: u32, py: u32) -> Vec4 {
        let l = self.get_pixel(px, py).0[0] as f32 / 255.0;
        Vec4::new(l, l, l, 1.0)
    }

    fn grayscale(&self, px: u32, py: u32) -> f32 {
        self.get_pixel(px, py).0[0] as f32 / 255.0
    }
}

/// Truncate a scaled grid coordinate and wrap it into `[0, extent)`.
#[inline]
fn wrap_pixel(cell: usize, scale: f32, extent: u32) -> u32 {
    let scaled = (cell as f32 * scale) as i64;
    scaled.rem_euclid(extent as i64) as u32
}

impl<R: Rng> TerrainGenerator<'_, R> {
    /// Add `grayscale(pixel(x * scale.x, y * scale.z)) * scale.y` to every cell.
    ///
    /// Pixel coordinates are truncated, not interpolated, and repeat outside
    /// the image bounds.
    pub fn image_heights(
        &mut self,
        image: &impl HeightImage,
        scale: Vec3,
    ) -> Result<(), TerrainError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(TerrainError::invalid("height_image", "image has no pixels"));
        }
        if !scale.is_finite() {
            return Err(TerrainError::invalid("height_image_scale", "scale is not finite"));
        }

        let reset = self.reset_before_apply;
        let (w, h) = (image.width(), image.height());
        self.transact(reset, |grid, _| {
            for y in 0..grid.resolution {
                for x in 0..grid.resolution {
                    let px = wrap_pixel(x, scale.x, w);
                    let py = wrap_pixel(y, scale.z, h);
                    grid.add(x, y, image.grayscale(px, py) * scale.y);
                }
            }
        })?;

        tracing::debug!(width = w, height = h, ?scale, "applied image heights");
        Ok(())
    }
}
