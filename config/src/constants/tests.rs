//! Tests for the centralized configuration constants.

use super::*;

/// Ensures default constants are sane and positive.
#[test]
fn default_constants_are_valid() {
    let cfg = PipelineConfig::default();
    assert!(cfg.grid_epsilon > 0.0);
    assert!(cfg.area_epsilon > 0.0);
    assert!(cfg.vertex_merge_epsilon > 0.0);
    assert!(cfg.parallel);
}

/// The area tolerance must follow the grid tolerance.
#[test]
fn area_epsilon_is_squared_grid_epsilon() {
    let cfg = PipelineConfig::new(1.0e-2, 1.0e-6).unwrap();
    assert_eq!(cfg.area_epsilon, 1.0e-4);
}

/// Validates the builder rejects invalid values.
#[test]
fn new_validates_inputs() {
    assert_eq!(
        PipelineConfig::new(0.0, 1.0e-6).unwrap_err(),
        ConfigError::InvalidGridEpsilon(0.0)
    );
    assert_eq!(
        PipelineConfig::new(1.0e-3, -1.0).unwrap_err(),
        ConfigError::InvalidVertexMergeEpsilon(-1.0)
    );
    assert!(PipelineConfig::new(f64::NAN, 1.0e-6).is_err());
}

/// Sequential mode only flips the scheduling flag.
#[test]
fn sequential_preserves_tolerances() {
    let cfg = PipelineConfig::default().sequential();
    assert!(!cfg.parallel);
    assert_eq!(cfg.grid_epsilon, DEFAULT_GRID_EPSILON);
}
