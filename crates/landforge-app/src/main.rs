//! Landforge command-line harness.
//!
//! Loads `config.ron` (creating it on first run), applies CLI overrides, runs
//! the generator pipeline, and writes preview images plus the placed instance
//! list to the output directory.
//!
//! Run with: `cargo run -p landforge-app -- --output out --seed 7`

mod error;
mod pipeline;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use landforge_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info};

use crate::error::AppError;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone().or_else(default_config_dir) {
        Some(dir) => dir,
        None => {
            eprintln!("{}", AppError::NoConfigDir);
            return ExitCode::FAILURE;
        }
    };

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", AppError::from(err));
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);

    let output_dir = args.output.clone().unwrap_or_else(|| PathBuf::from("landforge-out"));
    landforge_log::init_logging(Some(&output_dir), config.debug.json_log, Some(&config));

    match run(&config, &config_dir, &output_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, config_dir: &Path, output_dir: &Path) -> Result<(), AppError> {
    info!(
        seed = config.terrain.seed,
        resolution = config.terrain.resolution,
        config = %config_dir.display(),
        "Landforge starting"
    );
    let artifacts = pipeline::generate(config, config_dir)?;
    pipeline::write_artifacts(&artifacts, &config.splat.palette, output_dir)?;
    Ok(())
}
