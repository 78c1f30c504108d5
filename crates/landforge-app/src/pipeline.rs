//! The generation run: heightfield passes, derived surface data, and export.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use glam::Vec3;
use landforge_config::{Config, GenerationStep};
use landforge_terrain::{
    Heightfield, HeightfieldSurface, PlacedInstance, PreviewImage, SplatMap, TerrainGenerator,
    compose_splat_map, generate_noise_texture, render_heightfield, render_splat_map, scatter,
    terrain_rng,
};
use rand::Rng;
use tracing::{debug, info};

use crate::error::AppError;

pub const HEIGHTMAP_FILE: &str = "heightmap.png";
pub const SPLATMAP_FILE: &str = "splatmap.png";
pub const NOISE_TEXTURE_FILE: &str = "noise_texture.png";
pub const INSTANCES_FILE: &str = "instances.json";

/// Everything one run produces.
#[derive(Debug)]
pub struct Artifacts {
    pub heightfield: Heightfield,
    pub splat: SplatMap,
    pub instances: Vec<PlacedInstance>,
    pub texture: PreviewImage,
}

/// Run the configured pipeline and derive splat weights, instances, and the
/// noise texture from the result.
///
/// Relative `height_image` paths resolve against `config_dir`.
pub fn generate(config: &Config, config_dir: &Path) -> Result<Artifacts, AppError> {
    let terrain = &config.terrain;
    let heightfield = build_heightfield(config, config_dir)?;

    let splat = compose_splat_map(
        &heightfield,
        &config.splat.layers,
        config.splat.alpha_resolution,
    )?;

    let surface = HeightfieldSurface::new(&heightfield, Vec3::from_array(terrain.size));
    let mut scatter_rng = terrain_rng(terrain.seed, "scatter");
    let instances = scatter(
        &surface,
        &config.vegetation.layers,
        &config.vegetation.placement,
        &mut scatter_rng,
    )?;

    let texture = generate_noise_texture(&config.texture)?;

    info!(
        resolution = terrain.resolution,
        passes = terrain.pipeline.len(),
        instances = instances.len(),
        "generation complete"
    );
    Ok(Artifacts {
        heightfield,
        splat,
        instances,
        texture,
    })
}

/// Apply the configured generator passes, in order, to a zeroed heightfield.
///
/// Each pass draws from its own RNG stream, labelled with the step name and
/// its position in the pipeline.
pub fn build_heightfield(config: &Config, config_dir: &Path) -> Result<Heightfield, AppError> {
    let terrain = &config.terrain;
    let mut heightfield = Heightfield::new(terrain.resolution)?;

    for (index, step) in terrain.pipeline.iter().copied().enumerate() {
        let stream = format!("{}#{index}", step.name());
        let mut rng = terrain_rng(terrain.seed, &stream);
        let mut generator =
            TerrainGenerator::new(&mut heightfield, &mut rng, terrain.reset_before_apply);
        apply_step(&mut generator, step, config, config_dir)?;

        let (min, max) = generator.field().min_max();
        debug!(step = step.name(), min, max, "applied generator pass");
    }
    Ok(heightfield)
}

fn apply_step<R: Rng>(
    generator: &mut TerrainGenerator<'_, R>,
    step: GenerationStep,
    config: &Config,
    config_dir: &Path,
) -> Result<(), AppError> {
    let params = &config.generators;
    match step {
        GenerationStep::Reset => generator.reset(),
        GenerationStep::RandomJitter => generator.random_jitter(params.random_range)?,
        GenerationStep::ImageHeights => {
            let path = params
                .height_image
                .as_ref()
                .ok_or(AppError::MissingHeightImage)?;
            let image = image::open(config_dir.join(path))?.to_rgba8();
            generator.image_heights(&image, Vec3::from_array(params.image_scale))?;
        }
        GenerationStep::SingleNoise => generator.single_noise(&params.single_noise)?,
        GenerationStep::LayeredNoise => generator.layered_noise(&params.noise_layers)?,
        GenerationStep::CellularPeaks => {
            let accepted = generator.cellular_peaks(&params.peaks)?;
            debug!(accepted, requested = params.peaks.count, "placed peaks");
        }
        GenerationStep::MidpointDisplacement => {
            generator.midpoint_displacement(&params.midpoint)?;
        }
        GenerationStep::Smooth => generator.smooth(params.smooth_iterations)?,
    }
    Ok(())
}

/// Write preview PNGs and the instance list into `out_dir`.
pub fn write_artifacts(
    artifacts: &Artifacts,
    palette: &[[u8; 3]],
    out_dir: &Path,
) -> Result<(), AppError> {
    std::fs::create_dir_all(out_dir)?;

    render_heightfield(&artifacts.heightfield)
        .to_rgba_image()
        .save(out_dir.join(HEIGHTMAP_FILE))?;
    render_splat_map(&artifacts.splat, palette)
        .to_rgba_image()
        .save(out_dir.join(SPLATMAP_FILE))?;
    artifacts
        .texture
        .to_rgba_image()
        .save(out_dir.join(NOISE_TEXTURE_FILE))?;

    let writer = BufWriter::new(File::create(out_dir.join(INSTANCES_FILE))?);
    serde_json::to_writer_pretty(writer, &artifacts.instances)?;

    info!(dir = %out_dir.display(), "wrote artifacts");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use landforge_terrain::{LayerList, NoiseTextureParams, VegetationLayerParams};

    fn small_config() -> Config {
        let mut config = Config::default();
        config.terrain.resolution = 33;
        config.terrain.size = [64.0, 10.0, 64.0];
        config.terrain.seed = 11;
        config.terrain.pipeline = vec![
            GenerationStep::Reset,
            GenerationStep::LayeredNoise,
            GenerationStep::CellularPeaks,
            GenerationStep::MidpointDisplacement,
            GenerationStep::Smooth,
        ];
        config.splat.alpha_resolution = 17;
        config.vegetation.placement.spacing = 4;
        config.vegetation.layers = LayerList::new(VegetationLayerParams {
            min_height: -10.0,
            max_height: 10.0,
            density: 1.0,
            ..Default::default()
        });
        config.texture = NoiseTextureParams {
            width: 16,
            height: 16,
            ..Default::default()
        };
        config
    }

    #[test]
    fn test_every_default_step_shapes_the_terrain() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.terrain.resolution = 33;
        let full = build_heightfield(&config, dir.path()).unwrap();

        let defaults = config.terrain.pipeline.clone();
        for skipped in 0..defaults.len() {
            let mut without = config.clone();
            without.terrain.pipeline.remove(skipped);
            let partial = build_heightfield(&without, dir.path()).unwrap();
            assert_ne!(
                partial, full,
                "dropping {:?} from the default pipeline changed nothing",
                defaults[skipped]
            );
        }
    }

    #[test]
    fn test_same_seed_same_terrain() {
        let dir = tempfile::tempdir().unwrap();
        let a = generate(&small_config(), dir.path()).unwrap();
        let b = generate(&small_config(), dir.path()).unwrap();
        assert_eq!(a.heightfield, b.heightfield);
        assert_eq!(a.instances, b.instances);
    }

    #[test]
    fn test_different_seed_different_terrain() {
        let dir = tempfile::tempdir().unwrap();
        let mut other = small_config();
        other.terrain.seed = 12;
        let a = generate(&small_config(), dir.path()).unwrap();
        let b = generate(&other, dir.path()).unwrap();
        assert_ne!(a.heightfield, b.heightfield);
    }

    #[test]
    fn test_artifact_shapes_follow_config() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = generate(&small_config(), dir.path()).unwrap();
        assert_eq!(artifacts.heightfield.resolution(), 33);
        assert_eq!(artifacts.splat.width(), 17);
        assert_eq!(artifacts.texture.dimensions(), (16, 16));
        assert!(!artifacts.instances.is_empty());
    }

    #[test]
    fn test_write_artifacts_creates_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let config = small_config();
        let artifacts = generate(&config, dir.path()).unwrap();
        write_artifacts(&artifacts, &config.splat.palette, &out).unwrap();

        for name in [HEIGHTMAP_FILE, SPLATMAP_FILE, NOISE_TEXTURE_FILE, INSTANCES_FILE] {
            assert!(out.join(name).exists(), "{name} missing");
        }
        let heightmap = image::open(out.join(HEIGHTMAP_FILE)).unwrap();
        assert_eq!((heightmap.width(), heightmap.height()), (33, 33));

        let json = std::fs::read_to_string(out.join(INSTANCES_FILE)).unwrap();
        let instances: Vec<PlacedInstance> = serde_json::from_str(&json).unwrap();
        assert_eq!(instances.len(), artifacts.instances.len());
    }

    #[test]
    fn test_image_heights_requires_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config();
        config.terrain.pipeline = vec![GenerationStep::ImageHeights];
        let result = generate(&config, dir.path());
        assert!(matches!(result, Err(AppError::MissingHeightImage)));
    }

    #[test]
    fn test_image_heights_reads_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        image::GrayImage::from_pixel(4, 4, image::Luma([255]))
            .save(dir.path().join("white.png"))
            .unwrap();

        let mut config = small_config();
        config.terrain.pipeline = vec![GenerationStep::ImageHeights];
        config.generators.height_image = Some("white.png".into());
        config.generators.image_scale = [1.0, 0.5, 1.0];
        let artifacts = generate(&config, dir.path()).unwrap();
        assert!(
            artifacts
                .heightfield
                .values()
                .iter()
                .all(|&v| (v - 0.5).abs() < 1e-5)
        );
    }

    #[test]
    fn test_invalid_parameters_abort_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config();
        config.terrain.pipeline = vec![GenerationStep::RandomJitter];
        config.generators.random_range = [1.0, 0.0];
        let result = generate(&config, dir.path());
        assert!(matches!(result, Err(AppError::Terrain(_))));
    }
}
