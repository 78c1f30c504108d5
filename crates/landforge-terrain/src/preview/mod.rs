//! CPU-side preview rendering for heightfields, splat maps, and noise textures.

mod image;
mod renderers;

pub use self::image::PreviewImage;
pub use renderers::{
    NoiseTextureParams, SPLAT_PALETTE, generate_noise_texture, render_heightfield,
    render_splat_map,
};
