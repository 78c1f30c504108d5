//! Configuration for the Landforge terrain tool.
//!
//! Generator, splat, vegetation, and texture settings persist to disk as a
//! single RON file. Command-line arguments override individual values after
//! loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, GenerationStep, GeneratorConfig, SplatConfig, TerrainConfig,
    VegetationConfig, default_config_dir,
};
pub use error::ConfigError;
