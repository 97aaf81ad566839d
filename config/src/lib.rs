//! # Config Crate
//!
//! Centralized configuration constants for the layout extrusion pipeline.
//! All magic numbers and tunable tolerances are defined here to ensure
//! consistency across crates and easy configuration management.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_GRID_EPSILON, PipelineConfig};
//!
//! // Use the grid epsilon for coordinate snapping decisions
//! let gap: f64 = 0.0001;
//! let coincident = gap < DEFAULT_GRID_EPSILON;
//! assert!(coincident);
//!
//! // Build a validated configuration snapshot
//! let config = PipelineConfig::default();
//! assert!(config.grid_epsilon > 0.0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All tolerances defined once, used everywhere
//! - **Tunable**: Wrong epsilon selection is the most likely source of mesh
//!   artifacts (slivers, missing slivers), so every tolerance is a parameter
//!   with a documented default, not a hard-wired constant
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
