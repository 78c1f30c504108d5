//! Cellular (Voronoi-style) peaks with radial falloff.

use std::f32::consts::{PI, SQRT_2};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::TerrainGenerator;
use crate::error::{TerrainError, ensure_range};
use crate::seed::sample_range;

/// Falloff shape around each peak.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoronoiKind {
    /// `peak - d * falloff`
    #[default]
    Linear,
    /// `peak - d^dropoff * falloff`
    Power,
    /// `peak - d * falloff - d^dropoff`
    Combined,
    /// `peak - sin(d * 100) * 0.1`, concentric ripples.
    Sin,
    /// `peak - (3d)^falloff - sin(2 pi d) / dropoff`
    Macorine,
}

impl VoronoiKind {
    /// Candidate height at normalized distance `d` from a peak of height `peak`.
    #[inline]
    pub fn height(self, peak: f32, d: f32, falloff: f32, dropoff: f32) -> f32 {
        match self {
            Self::Linear => peak - d * falloff,
            Self::Power => peak - d.powf(dropoff) * falloff,
            Self::Combined => peak - d * falloff - d.powf(dropoff),
            Self::Sin => peak - (d * 100.0).sin() * 0.1,
            Self::Macorine => peak - (d * 3.0).powf(falloff) - (d * 2.0 * PI).sin() / dropoff,
        }
    }
}

/// Parameters for [`TerrainGenerator::cellular_peaks`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakParams {
    /// Number of peak attempts.
    pub count: u32,
    pub falloff: f32,
    pub dropoff: f32,
    /// Peak heights are drawn from `[min_height, max_height]`.
    pub min_height: f32,
    pub max_height: f32,
    pub kind: VoronoiKind,
}

impl Default for PeakParams {
    fn default() -> Self {
        Self {
            count: 1,
            falloff: 0.2,
            dropoff: 0.6,
            min_height: 0.0,
            max_height: 0.5,
            kind: VoronoiKind::Linear,
        }
    }
}

impl PeakParams {
    pub fn validate(&self) -> Result<(), TerrainError> {
        ensure_range("peaks.height", self.min_height, self.max_height)?;
        if !self.falloff.is_finite() || !self.dropoff.is_finite() {
            return Err(TerrainError::invalid("peaks.falloff", "falloff and dropoff must be finite"));
        }
        if self.kind == VoronoiKind::Macorine && self.dropoff == 0.0 {
            return Err(TerrainError::invalid("peaks.dropoff", "macorine peaks divide by dropoff"));
        }
        Ok(())
    }
}

impl<R: Rng> TerrainGenerator<'_, R> {
    /// Raise the terrain around `params.count` randomly seeded peaks.
    ///
    /// A peak whose drawn height does not exceed the existing height at its
    /// cell is discarded without retry. Cells are only ever raised. Returns
    /// the number of peaks that were accepted.
    pub fn cellular_peaks(&mut self, params: &PeakParams) -> Result<u32, TerrainError> {
        params.validate()?;

        let reset = self.reset_before_apply;
        let accepted = self.transact(reset, |grid, rng| {
            let r = grid.resolution;
            let max_distance = r as f32 * SQRT_2;
            let mut accepted = 0;

            for _ in 0..params.count {
                let px = rng.random_range(0..r);
                let pz = rng.random_range(0..r);
                let py = sample_range(rng, params.min_height, params.max_height);

                if grid.get(px, pz) >= py {
                    tracing::trace!(px, pz, py, "peak rejected");
                    continue;
                }
                grid.set(px, pz, py);
                accepted += 1;

                for z in 0..r {
                    for x in 0..r {
                        if x == px && z == pz {
                            continue;
                        }
                        let dx = x as f32 - px as f32;
                        let dz = z as f32 - pz as f32;
                        let d = (dx * dx + dz * dz).sqrt() / max_distance;
                        let candidate =
                            params.kind.height(py, d, params.falloff, params.dropoff);
                        if candidate > grid.get(x, z) {
                            grid.set(x, z, candidate);
                        }
                    }
                }
            }
            accepted
        })?;

        tracing::debug!(
            attempts = params.count,
            accepted,
            kind = ?params.kind,
            "applied cellular peaks"
        );
        Ok(accepted)
    }
}
