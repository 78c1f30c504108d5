//! Layer parameter records and the never-empty ordered list that holds them.

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, ensure_range};

// ---------------------------------------------------------------------------
// LayerList
// ---------------------------------------------------------------------------

/// A layer entry that can be flagged for removal by the caller.
pub trait Removable {
    /// Returns `true` if the next [`LayerList::remove_flagged`] should drop this entry.
    fn marked_for_removal(&self) -> bool;
}

/// Ordered list of layer parameters that always holds at least one entry.
///
/// Order is preserved. For splat layers it defines the output channel; for
/// vegetation it defines the prototype index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<T>", into = "Vec<T>")]
#[serde(bound(
    serialize = "T: Serialize + Clone",
    deserialize = "T: Deserialize<'de>"
))]
pub struct LayerList<T> {
    entries: Vec<T>,
}

impl<T> LayerList<T> {
    /// Create a list holding a single entry.
    pub fn new(first: T) -> Self {
        Self {
            entries: vec![first],
        }
    }

    /// Create a list from existing entries.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::EmptyLayerList`] if `entries` is empty.
    pub fn from_vec(entries: Vec<T>) -> Result<Self, TerrainError> {
        if entries.is_empty() {
            return Err(TerrainError::EmptyLayerList);
        }
        Ok(Self { entries })
    }

    /// Append an entry at the end.
    pub fn add(&mut self, entry: T) {
        self.entries.push(entry);
    }

    /// Number of entries. Never zero.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the entries in order.
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    /// Mutable access to an entry, e.g. to toggle its removal flag.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index)
    }

    /// Iterate over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }
}

impl<T: Removable> LayerList<T> {
    /// Drop every entry flagged for removal.
    ///
    /// If every entry is flagged, the original first entry is kept as-is so
    /// the list never becomes empty. Returns the number of entries dropped.
    pub fn remove_flagged(&mut self) -> usize {
        let before = self.entries.len();
        let mut drained = std::mem::take(&mut self.entries).into_iter();
        let first = drained.next();
        let mut kept: Vec<T> = Vec::with_capacity(before);
        let mut fallback = None;

        if let Some(first) = first {
            if first.marked_for_removal() {
                fallback = Some(first);
            } else {
                kept.push(first);
            }
        }
        kept.extend(drained.filter(|e| !e.marked_for_removal()));

        if kept.is_empty() {
            kept.extend(fallback);
        }
        self.entries = kept;
        before - self.entries.len()
    }
}

impl<T: Default> Default for LayerList<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> std::ops::Index<usize> for LayerList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.entries[index]
    }
}

impl<'a, T> IntoIterator for &'a LayerList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T> TryFrom<Vec<T>> for LayerList<T> {
    type Error = TerrainError;

    fn try_from(entries: Vec<T>) -> Result<Self, Self::Error> {
        Self::from_vec(entries)
    }
}

impl<T> From<LayerList<T>> for Vec<T> {
    fn from(list: LayerList<T>) -> Self {
        list.entries
    }
}

// ---------------------------------------------------------------------------
// Noise layers
// ---------------------------------------------------------------------------

/// One fractal-noise contribution to the heightfield.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseLayerParams {
    /// Horizontal frequency applied to the offset x coordinate.
    pub x_scale: f32,
    /// Horizontal frequency applied to the offset y coordinate.
    pub y_scale: f32,
    /// Cell offset added to x before scaling.
    pub x_offset: u32,
    /// Cell offset added to y before scaling.
    pub y_offset: u32,
    /// Octave count, at least 1.
    pub octaves: u32,
    /// Amplitude multiplier per octave. Any positive value.
    pub persistence: f32,
    /// Multiplier applied to the normalized fractal value.
    pub height_scale: f32,
    /// Drop this entry on the next removal pass.
    pub remove: bool,
}

impl Default for NoiseLayerParams {
    fn default() -> Self {
        Self {
            x_scale: 0.01,
            y_scale: 0.01,
            x_offset: 0,
            y_offset: 0,
            octaves: 3,
            persistence: 8.0,
            height_scale: 0.09,
            remove: false,
        }
    }
}

impl NoiseLayerParams {
    /// Reject octave counts and persistence values the fractal loop cannot use.
    pub fn validate(&self) -> Result<(), TerrainError> {
        validate_fractal(self.octaves, self.persistence)
    }
}

impl Removable for NoiseLayerParams {
    fn marked_for_removal(&self) -> bool {
        self.remove
    }
}

pub(crate) fn validate_fractal(octaves: u32, persistence: f32) -> Result<(), TerrainError> {
    if octaves == 0 {
        return Err(TerrainError::invalid("octaves", "must be at least 1"));
    }
    if !persistence.is_finite() || persistence <= 0.0 {
        return Err(TerrainError::invalid(
            "persistence",
            format!("must be positive, got {persistence}"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Splat layers
// ---------------------------------------------------------------------------

/// Height/slope band that assigns one texture channel of the splat map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplatLayerParams {
    /// Texture or material handle, opaque to the generator.
    pub texture: String,
    pub min_height: f32,
    pub max_height: f32,
    pub min_slope: f32,
    pub max_slope: f32,
    /// UV offset forwarded to the renderer.
    pub tile_offset: [f32; 2],
    /// Texture tile size forwarded to the renderer.
    pub tile_size: [f32; 2],
    /// Constant widening of the height band on both sides.
    pub splat_offset: f32,
    pub noise_x_scale: f32,
    pub noise_y_scale: f32,
    /// Amplitude of the noise that jitters the height band edges.
    pub noise_scaler: f32,
    pub remove: bool,
}

impl Default for SplatLayerParams {
    fn default() -> Self {
        Self {
            texture: String::new(),
            min_height: 0.1,
            max_height: 0.2,
            min_slope: 0.0,
            max_slope: 1.5,
            tile_offset: [0.0, 0.0],
            tile_size: [50.0, 50.0],
            splat_offset: 0.01,
            noise_x_scale: 0.01,
            noise_y_scale: 0.01,
            noise_scaler: 0.5,
            remove: false,
        }
    }
}

impl SplatLayerParams {
    pub fn validate(&self) -> Result<(), TerrainError> {
        ensure_range("splat.height", self.min_height, self.max_height)?;
        ensure_range("splat.slope", self.min_slope, self.max_slope)
    }
}

impl Removable for SplatLayerParams {
    fn marked_for_removal(&self) -> bool {
        self.remove
    }
}

// ---------------------------------------------------------------------------
// Vegetation layers
// ---------------------------------------------------------------------------

/// Placement rules for one scattered prototype (tree, rock, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationLayerParams {
    /// Mesh or prefab handle, opaque to the generator.
    pub mesh: String,
    /// Normalized height band, `[0, 1]` of the terrain height scale.
    pub min_height: f32,
    pub max_height: f32,
    /// Slope band, in the units reported by the terrain host.
    pub min_slope: f32,
    pub max_slope: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Rotation range in degrees.
    pub min_rotation: f32,
    pub max_rotation: f32,
    /// Gate probability in `[0, 1]`. See [`crate::scatter`].
    pub density: f32,
    /// Instance colors are interpolated between `color1` and `color2`.
    pub color1: Vec4,
    pub color2: Vec4,
    pub lightmap_color: Vec4,
    pub remove: bool,
}

impl Default for VegetationLayerParams {
    fn default() -> Self {
        Self {
            mesh: String::new(),
            min_height: 0.1,
            max_height: 0.2,
            min_slope: 0.0,
            max_slope: 90.0,
            min_scale: 0.5,
            max_scale: 0.95,
            min_rotation: 0.0,
            max_rotation: 360.0,
            density: 0.5,
            color1: Vec4::ONE,
            color2: Vec4::ONE,
            lightmap_color: Vec4::ONE,
            remove: false,
        }
    }
}

impl VegetationLayerParams {
    pub fn validate(&self) -> Result<(), TerrainError> {
        ensure_range("vegetation.height", self.min_height, self.max_height)?;
        ensure_range("vegetation.slope", self.min_slope, self.max_slope)?;
        ensure_range("vegetation.scale", self.min_scale, self.max_scale)?;
        ensure_range("vegetation.rotation", self.min_rotation, self.max_rotation)?;
        if !(0.0..=1.0).contains(&self.density) {
            return Err(TerrainError::invalid(
                "vegetation.density",
                format!("must lie in [0, 1], got {}", self.density),
            ));
        }
        Ok(())
    }
}

impl Removable for VegetationLayerParams {
    fn marked_for_removal(&self) -> bool {
        self.remove
    }
}
