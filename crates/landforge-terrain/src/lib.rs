//! Procedural terrain authoring: heightfield generators, splat-map composition,
//! vegetation scattering, and preview rendering.
//!
//! All randomness flows through explicit RNG handles; see [`terrain_rng`] for
//! deriving reproducible per-pass streams from a terrain seed.

mod error;
mod heightfield;
mod kernel;
mod layers;
mod scatter;
mod seed;
mod splat;
mod surface;

pub mod generators;
pub mod preview;

pub use error::TerrainError;
pub use generators::{HeightImage, MidpointParams, PeakParams, TerrainGenerator, VoronoiKind};
pub use heightfield::Heightfield;
pub use kernel::{fractal_noise, smooth_noise_2d};
pub use layers::{
    LayerList, NoiseLayerParams, Removable, SplatLayerParams, VegetationLayerParams,
};
pub use preview::{
    NoiseTextureParams, PreviewImage, generate_noise_texture, render_heightfield,
    render_splat_map,
};
pub use scatter::{PlacedInstance, ScatterParams, scatter};
pub use seed::{derive_stream_seed, terrain_rng};
pub use splat::{SplatMap, compose_splat_map};
pub use surface::{HeightfieldSurface, TerrainSurface, slope_at};
