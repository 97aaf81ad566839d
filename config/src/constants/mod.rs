//! Centralized configuration values shared across the layout extrusion
//! pipeline.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

/// Coordinate snapping tolerance in layout units.
///
/// Points closer than this are collapsed to one representative point during
/// ring normalization, and edges closer than this are treated as coincident
/// during boolean merging. The default corresponds to one GDSII database
/// unit (1 nm with the conventional 1 µm user unit), which absorbs the
/// integer quantization noise of the source format.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_GRID_EPSILON;
/// assert!(DEFAULT_GRID_EPSILON < 1.0e-2);
/// ```
pub const DEFAULT_GRID_EPSILON: f64 = 1.0e-3;

/// Area tolerance in squared layout units.
///
/// Rings and triangulated polygons whose area falls below this threshold are
/// treated as empty. Defaults to the square of [`DEFAULT_GRID_EPSILON`].
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_AREA_EPSILON;
/// assert!(DEFAULT_AREA_EPSILON < 1.0e-4);
/// ```
pub const DEFAULT_AREA_EPSILON: f64 = DEFAULT_GRID_EPSILON * DEFAULT_GRID_EPSILON;

/// Vertex deduplication tolerance used by the mesh assembler.
///
/// 3D vertex positions within this distance of each other are unified into a
/// single mesh index. Kept smaller than the grid epsilon so that assembly
/// never moves geometry, only compacts it.
///
/// # Examples
/// ```
/// use config::constants::{DEFAULT_GRID_EPSILON, DEFAULT_VERTEX_MERGE_EPSILON};
/// assert!(DEFAULT_VERTEX_MERGE_EPSILON <= DEFAULT_GRID_EPSILON);
/// ```
pub const DEFAULT_VERTEX_MERGE_EPSILON: f64 = 1.0e-6;

/// Immutable snapshot of pipeline settings that can be shared between crates
/// and worker tasks.
///
/// # Examples
/// ```
/// use config::constants::PipelineConfig;
/// let config = PipelineConfig::default();
/// assert!(config.area_epsilon > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Coordinate snapping and merge-classification tolerance.
    pub grid_epsilon: f64,
    /// Area threshold below which geometry is considered empty.
    pub area_epsilon: f64,
    /// Vertex unification tolerance for final mesh assembly.
    pub vertex_merge_epsilon: f64,
    /// Process layers on a worker pool. Output is identical either way.
    pub parallel: bool,
}

impl PipelineConfig {
    /// Builds a configuration enforcing strict validation of every tolerance.
    ///
    /// The area epsilon is derived as the square of the grid epsilon.
    ///
    /// # Examples
    /// ```
    /// use config::constants::PipelineConfig;
    /// let cfg = PipelineConfig::new(1.0e-4, 1.0e-7).expect("valid config");
    /// assert_eq!(cfg.area_epsilon, 1.0e-8);
    /// ```
    pub fn new(grid_epsilon: f64, vertex_merge_epsilon: f64) -> Result<Self, ConfigError> {
        if !grid_epsilon.is_finite() || grid_epsilon <= 0.0 {
            return Err(ConfigError::InvalidGridEpsilon(grid_epsilon));
        }
        if !vertex_merge_epsilon.is_finite() || vertex_merge_epsilon <= 0.0 {
            return Err(ConfigError::InvalidVertexMergeEpsilon(vertex_merge_epsilon));
        }
        Ok(Self {
            grid_epsilon,
            area_epsilon: grid_epsilon * grid_epsilon,
            vertex_merge_epsilon,
            parallel: true,
        })
    }

    /// Returns a copy of this configuration with sequential layer processing.
    ///
    /// # Examples
    /// ```
    /// use config::constants::PipelineConfig;
    /// let cfg = PipelineConfig::default().sequential();
    /// assert!(!cfg.parallel);
    /// ```
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            grid_epsilon: DEFAULT_GRID_EPSILON,
            area_epsilon: DEFAULT_AREA_EPSILON,
            vertex_merge_epsilon: DEFAULT_VERTEX_MERGE_EPSILON,
            parallel: true,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Raised when the grid epsilon is zero, negative, or non-finite.
    InvalidGridEpsilon(f64),
    /// Raised when the vertex merge epsilon is zero, negative, or non-finite.
    InvalidVertexMergeEpsilon(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidGridEpsilon(value) => {
                write!(f, "grid_epsilon must be positive and finite: {value}")
            }
            ConfigError::InvalidVertexMergeEpsilon(value) => {
                write!(f, "vertex_merge_epsilon must be positive and finite: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests;
