//! Preview renderers: heightfield, splat map, and procedural noise textures.

use serde::{Deserialize, Serialize};

use super::image::{PreviewImage, pixel_count, unit_to_u8};
use crate::error::TerrainError;
use crate::heightfield::Heightfield;
use crate::kernel::fractal_noise;
use crate::layers::validate_fractal;
use crate::splat::SplatMap;

/// Render the heightfield as grayscale, one pixel per cell.
///
/// Elevations outside `[0, 1]` are clamped for display only.
pub fn render_heightfield(field: &Heightfield) -> PreviewImage {
    let r = field.resolution() as u32;
    let mut image = PreviewImage::new(r, r);
    for y in 0..r {
        for x in 0..r {
            let v = unit_to_u8(field.get(x as usize, y as usize));
            image.set_pixel(x, y, [v, v, v, 255]);
        }
    }
    image
}

/// Default channel colors for splat previews, cycled when there are more layers.
pub const SPLAT_PALETTE: [[u8; 3]; 6] = [
    [220, 200, 130],
    [60, 150, 50],
    [120, 100, 80],
    [240, 240, 250],
    [30, 80, 200],
    [150, 60, 150],
];

/// Blend `palette` colors by each cell's layer weights.
///
/// Cells that matched no layer render as transparent black.
pub fn render_splat_map(splat: &SplatMap, palette: &[[u8; 3]]) -> PreviewImage {
    let palette = if palette.is_empty() { &SPLAT_PALETTE[..] } else { palette };
    let mut image = PreviewImage::new(splat.width() as u32, splat.height() as u32);

    for y in 0..splat.height() {
        for x in 0..splat.width() {
            let weights = splat.weights(x, y);
            let mut rgb = [0.0f32; 3];
            let mut total = 0.0;
            for (i, &w) in weights.iter().enumerate() {
                let color = palette[i % palette.len()];
                for c in 0..3 {
                    rgb[c] += color[c] as f32 * w;
                }
                total += w;
            }
            let alpha = if total > 0.0 { 255 } else { 0 };
            image.set_pixel(
                x as u32,
                y as u32,
                [
                    rgb[0].round().min(255.0) as u8,
                    rgb[1].round().min(255.0) as u8,
                    rgb[2].round().min(255.0) as u8,
                    alpha,
                ],
            );
        }
    }
    image
}

/// Settings for a standalone procedural noise texture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseTextureParams {
    pub width: u32,
    pub height: u32,
    pub x_scale: f32,
    pub y_scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub height_scale: f32,
    pub x_offset: u32,
    pub y_offset: u32,
    /// Added as `0.5 * brightness` to every value.
    pub brightness: f32,
    /// Scales the distance of each value from 0.5.
    pub contrast: f32,
    /// Write the value into the alpha channel instead of full opacity.
    pub alpha: bool,
    /// Blend with the neighbouring tiles so the texture wraps without seams.
    ///
    /// The four tiled samples are blended bilinearly by the pixel's position
    /// and written as one gray value. Textures made this way do not match
    /// those of tools that pack the tiled samples into separate color
    /// channels before blending.
    pub seamless: bool,
    /// Stretch the observed value range to `[0, 1]`.
    pub remap: bool,
}

impl Default for NoiseTextureParams {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            x_scale: 0.01,
            y_scale: 0.01,
            octaves: 3,
            persistence: 0.5,
            height_scale: 1.0,
            x_offset: 0,
            y_offset: 0,
            brightness: 0.5,
            contrast: 0.5,
            alpha: false,
            seamless: false,
            remap: false,
        }
    }
}

impl NoiseTextureParams {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.width == 0 || self.height == 0 {
            return Err(TerrainError::invalid("texture.size", "width and height must be positive"));
        }
        validate_fractal(self.octaves, self.persistence)
    }

    fn sample(&self, x: f32, y: f32) -> f32 {
        let nx = (x + self.x_offset as f32) * self.x_scale;
        let ny = (y + self.y_offset as f32) * self.y_scale;
        fractal_noise(nx, ny, self.octaves, self.persistence) * self.height_scale
    }

    /// Noise value at pixel `(x, y)` before brightness and contrast.
    fn value(&self, x: u32, y: u32) -> f32 {
        let (fx, fy) = (x as f32, y as f32);
        if !self.seamless {
            return self.sample(fx, fy);
        }

        let (w, h) = (self.width as f32, self.height as f32);
        let u = fx / w;
        let v = fy / h;
        let n00 = self.sample(fx, fy);
        let n01 = self.sample(fx, fy + h);
        let n10 = self.sample(fx + w, fy);
        let n11 = self.sample(fx + w, fy + h);
        u * v * n00 + u * (1.0 - v) * n01 + (1.0 - u) * v * n10 + (1.0 - u) * (1.0 - v) * n11
    }
}

/// Render a fractal-noise texture.
///
/// Each value becomes `contrast * (v - 0.5) + 0.5 * brightness`. With
/// `remap`, the observed `[min, max]` of those values is stretched to
/// `[0, 1]` in the color channels; a constant image remaps to black.
pub fn generate_noise_texture(params: &NoiseTextureParams) -> Result<PreviewImage, TerrainError> {
    params.validate()?;

    let (w, h) = (params.width, params.height);
    let mut values = Vec::with_capacity(pixel_count(w, h));
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for y in 0..h {
        for x in 0..w {
            let c = params.contrast * (params.value(x, y) - 0.5) + 0.5 * params.brightness;
            min = min.min(c);
            max = max.max(c);
            values.push(c);
        }
    }

    let mut image = PreviewImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let c = values[y as usize * w as usize + x as usize];
            let alpha = if params.alpha { unit_to_u8(c) } else { 255 };
            let shade = if params.remap {
                if max > min { (c - min) / (max - min) } else { 0.0 }
            } else {
                c
            };
            let s = unit_to_u8(shade);
            image.set_pixel(x, y, [s, s, s, alpha]);
        }
    }

    tracing::debug!(width = w, height = h, min, max, "generated noise texture");
    Ok(image)
}
