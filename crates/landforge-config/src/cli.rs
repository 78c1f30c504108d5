//! Command-line argument parsing for the Landforge harness.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, GenerationStep};

/// Landforge command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "landforge", about = "Procedural terrain generator")]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory that receives the generated images and instance list.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Terrain seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Heightfield cells per side.
    #[arg(long)]
    pub resolution: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Comma-separated generator passes, replacing the configured pipeline.
    #[arg(long, value_enum, value_delimiter = ',')]
    pub steps: Option<Vec<GenerationStep>>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(resolution) = args.resolution {
            self.terrain.resolution = resolution;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref steps) = args.steps {
            self.terrain.pipeline = steps.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(99),
            resolution: Some(65),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.terrain.seed, 99);
        assert_eq!(config.terrain.resolution, 65);
        // Non-overridden fields retain defaults
        assert_eq!(config.debug.log_level, "info");
        assert_eq!(config.terrain.pipeline, Config::default().terrain.pipeline);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_steps_parse_from_command_line() {
        let args = CliArgs::try_parse_from([
            "landforge",
            "--steps",
            "reset,single_noise,smooth",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let mut config = Config::default();
        config.apply_cli_overrides(&args);
        assert_eq!(
            config.terrain.pipeline,
            vec![
                GenerationStep::Reset,
                GenerationStep::SingleNoise,
                GenerationStep::Smooth
            ]
        );
        assert_eq!(config.debug.log_level, "debug");
    }

    #[test]
    fn test_unknown_step_rejected() {
        let result = CliArgs::try_parse_from(["landforge", "--steps", "erode"]);
        assert!(result.is_err());
    }
}
