//! # Engine Errors and Warnings
//!
//! Error taxonomy of the extrusion engine:
//!
//! - **Configuration errors** ([`MeshError`]) are fatal and abort the whole
//!   conversion before any geometry work.
//! - **Geometry warnings** ([`RenderWarning`]) are recovered locally: the
//!   affected polygon or layer is skipped and processing continues. The
//!   caller receives every warning alongside the best-effort mesh.
//! - **Invariant violations** are internal defects and surface as
//!   [`MeshError::InvalidTopology`] rather than a silently corrupt mesh.

use std::fmt;

use config::constants::ConfigError;
use layout_ir::{LayerId, StackError};
use thiserror::Error;

/// Fatal errors of the extrusion pipeline.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Malformed layer stack (non-positive thickness, dangling via
    /// reference). Raised before any geometry work.
    #[error("invalid layer stack: {0}")]
    Stack(#[from] StackError),

    /// Invalid tolerance configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Internal invariant violation. Should not occur for any input that
    /// passed normalization; indicates a defect, not bad data.
    #[error("invalid topology: {message}")]
    InvalidTopology {
        message: String,
        layer: Option<LayerId>,
    },
}

impl MeshError {
    /// Creates an invalid topology error.
    pub fn invalid_topology(message: impl Into<String>, layer: Option<LayerId>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
            layer,
        }
    }
}

/// Recoverable per-layer or per-polygon problems.
///
/// Warnings never abort the run; they are collected in layer order and
/// returned with the mesh so downstream tooling can decide whether partial
/// output is acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderWarning {
    /// A ring collapsed below 3 distinct points after snapping and was
    /// dropped.
    DegenerateRing { layer: LayerId, points: usize },

    /// A layer carries geometry but has no stack entry; its polygons are
    /// skipped.
    MissingStackEntry { layer: LayerId },

    /// A layer produced no polygons after normalization and merging.
    EmptyLayer { layer: LayerId },

    /// One polygon could not be triangulated; the rest of the layer
    /// continues.
    Triangulation { layer: LayerId, message: String },
}

impl RenderWarning {
    /// The layer this warning refers to.
    pub fn layer(&self) -> LayerId {
        match self {
            RenderWarning::DegenerateRing { layer, .. }
            | RenderWarning::MissingStackEntry { layer }
            | RenderWarning::EmptyLayer { layer }
            | RenderWarning::Triangulation { layer, .. } => *layer,
        }
    }
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderWarning::DegenerateRing { layer, points } => {
                write!(
                    f,
                    "layer {layer}: ring collapsed to {points} distinct points, dropped"
                )
            }
            RenderWarning::MissingStackEntry { layer } => {
                write!(f, "layer {layer}: no stack entry, geometry skipped")
            }
            RenderWarning::EmptyLayer { layer } => {
                write!(f, "layer {layer}: no geometry left after merging")
            }
            RenderWarning::Triangulation { layer, message } => {
                write!(f, "layer {layer}: triangulation failed: {message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display_carries_layer() {
        let warning = RenderWarning::MissingStackEntry {
            layer: LayerId::new(68, 20),
        };
        assert!(warning.to_string().contains("68/20"));
        assert_eq!(warning.layer(), LayerId::new(68, 20));
    }

    #[test]
    fn test_stack_error_converts() {
        let err: MeshError = StackError::NonPositiveThickness {
            layer: LayerId::new(2, 0),
            thickness: -1.0,
        }
        .into();
        assert!(err.to_string().contains("2/0"));
    }
}
