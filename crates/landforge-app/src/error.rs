//! Harness error type.

use landforge_config::ConfigError;
use landforge_terrain::TerrainError;

/// Everything that can stop a generation run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Terrain(#[from] TerrainError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to encode instances: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `image_heights` is in the pipeline but no source image is configured.
    #[error("pipeline step `image_heights` needs `generators.height_image`")]
    MissingHeightImage,

    /// Neither `--config` nor a platform config directory is available.
    #[error("no config directory: pass --config")]
    NoConfigDir,
}
