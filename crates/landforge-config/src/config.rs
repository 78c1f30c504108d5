//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use landforge_terrain::{
    LayerList, MidpointParams, NoiseLayerParams, NoiseTextureParams, PeakParams, ScatterParams,
    SplatLayerParams, VegetationLayerParams, preview::SPLAT_PALETTE,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Grid, seed, and pipeline settings.
    pub terrain: TerrainConfig,
    /// Per-generator parameters.
    pub generators: GeneratorConfig,
    /// Texture-weight map settings.
    pub splat: SplatConfig,
    /// Scattered prototype settings.
    pub vegetation: VegetationConfig,
    /// Standalone noise texture.
    pub texture: NoiseTextureParams,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// One generator pass in the configured pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum GenerationStep {
    Reset,
    RandomJitter,
    ImageHeights,
    SingleNoise,
    LayeredNoise,
    CellularPeaks,
    MidpointDisplacement,
    Smooth,
}

impl GenerationStep {
    /// Stable name, also used to derive the step's RNG stream.
    pub fn name(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::RandomJitter => "random_jitter",
            Self::ImageHeights => "image_heights",
            Self::SingleNoise => "single_noise",
            Self::LayeredNoise => "layered_noise",
            Self::CellularPeaks => "cellular_peaks",
            Self::MidpointDisplacement => "midpoint_displacement",
            Self::Smooth => "smooth",
        }
    }
}

/// Heightfield and pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Cells per side of the heightfield.
    pub resolution: usize,
    /// World extent: x width, y height scale, z depth.
    pub size: [f32; 3],
    /// Seed every generator RNG stream is derived from.
    pub seed: u64,
    /// Additive generators start from a zero grid when set, discarding the
    /// output of earlier passes.
    pub reset_before_apply: bool,
    /// Generator passes, applied in order.
    pub pipeline: Vec<GenerationStep>,
}

/// Parameters for each generator pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Uniform jitter range added by `random_jitter`.
    pub random_range: [f32; 2],
    /// Source image for `image_heights`, relative to the config directory.
    pub height_image: Option<PathBuf>,
    /// Pixel scale (x, z) and height scale (y) for `image_heights`.
    pub image_scale: [f32; 3],
    pub single_noise: NoiseLayerParams,
    pub noise_layers: LayerList<NoiseLayerParams>,
    pub peaks: PeakParams,
    pub midpoint: MidpointParams,
    pub smooth_iterations: u32,
}

/// Splat map configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SplatConfig {
    /// Cells per side of the weight map; may differ from the heightfield.
    pub alpha_resolution: usize,
    /// Ordered texture layers; order is the output channel.
    pub layers: LayerList<SplatLayerParams>,
    /// Preview colors per channel, cycled when shorter than `layers`.
    pub palette: Vec<[u8; 3]>,
}

/// Vegetation scatter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VegetationConfig {
    pub placement: ScatterParams,
    /// Ordered prototypes; order is the prototype index.
    pub layers: LayerList<VegetationLayerParams>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write a JSON log file next to the outputs.
    pub json_log: bool,
}

// --- Default implementations ---

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            resolution: 513,
            size: [1000.0, 600.0, 1000.0],
            seed: 0,
            reset_before_apply: false,
            pipeline: vec![
                GenerationStep::LayeredNoise,
                GenerationStep::CellularPeaks,
                GenerationStep::Smooth,
            ],
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            random_range: [0.0, 0.1],
            height_image: None,
            image_scale: [1.0, 0.1, 1.0],
            single_noise: NoiseLayerParams::default(),
            noise_layers: LayerList::default(),
            peaks: PeakParams {
                count: 5,
                ..PeakParams::default()
            },
            midpoint: MidpointParams::default(),
            smooth_iterations: 1,
        }
    }
}

impl Default for SplatConfig {
    fn default() -> Self {
        Self {
            alpha_resolution: 512,
            layers: LayerList::default(),
            palette: SPLAT_PALETTE.to_vec(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_log: false,
        }
    }
}

/// Platform config directory for Landforge, if the platform defines one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("landforge"))
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                    path: config_path.clone(),
                    source,
                })?;
            let config: Config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: config_path.clone(),
                source,
            })?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(false)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landforge_terrain::VoronoiKind;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(4))
                .unwrap();
        assert!(ron_str.contains("resolution: 513"));
        assert!(ron_str.contains("layered_noise"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.generators.peaks.kind = VoronoiKind::Macorine;
        config.generators.height_image = Some(PathBuf::from("hills.png"));
        config.splat.layers.add(SplatLayerParams {
            texture: "rock".to_string(),
            min_height: 0.4,
            max_height: 1.0,
            ..Default::default()
        });
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(terrain: (seed: 42), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.terrain.seed, 42);
        assert_eq!(config.terrain.resolution, 513);
        assert_eq!(config.vegetation, VegetationConfig::default());
    }

    #[test]
    fn test_pipeline_parses_step_names() {
        let ron_str = "(terrain: (pipeline: [reset, midpoint_displacement, smooth]))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(
            config.terrain.pipeline,
            vec![
                GenerationStep::Reset,
                GenerationStep::MidpointDisplacement,
                GenerationStep::Smooth
            ]
        );
    }

    #[test]
    fn test_empty_layer_list_rejected() {
        let ron_str = "(splat: (layers: []))";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.terrain.resolution = 129;
        config.terrain.seed = 7;
        config.vegetation.placement.max_instances = 10;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        match &err {
            ConfigError::Parse { path, .. } => assert_eq!(path, &dir.path().join(CONFIG_FILE)),
            other => panic!("expected a parse error, got {other:?}"),
        }
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn test_unwritable_dir_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("taken");
        std::fs::write(&blocker, "not a directory").unwrap();
        let err = Config::default().save(&blocker).unwrap_err();
        assert!(matches!(&err, ConfigError::Write { path, .. } if path == &blocker));
    }

    #[test]
    fn test_step_names_match_serde() {
        for step in [GenerationStep::RandomJitter, GenerationStep::CellularPeaks] {
            let ron_str = ron::to_string(&step).unwrap();
            assert_eq!(ron_str, step.name());
        }
    }
}
