//! # Layout Mesh
//!
//! Extrusion engine: converts flat IC layout geometry plus a layer stack
//! into a watertight 3D surface mesh.
//!
//! ## Architecture
//!
//! ```text
//! layout-ir (LayerGeometry + LayerStack) → layout-mesh (RenderOutput)
//! ```
//!
//! ## Pipeline
//!
//! Per layer: normalize (snap, winding, hole classification) → merge
//! (2D boolean union, BSP trees) → triangulate (ear clipping with hole
//! bridging) → extrude (caps + side walls). Per-layer prisms are then
//! assembled into one deduplicated mesh in ascending layer order.
//!
//! All algorithms are pure Rust with no native dependencies. Geometry
//! defects in a single layer degrade to warnings; only configuration
//! errors (a malformed stack or tolerances) abort the conversion.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use layout_mesh::render_to_mesh;
//!
//! let output = render_to_mesh(&geometry, &stack, &config)?;
//! println!("{} triangles, {} warnings",
//!     output.mesh.triangle_count(), output.warnings.len());
//! ```

pub mod assemble;
pub mod error;
pub mod extrude;
pub mod merge;
pub mod mesh;
pub mod normalize;
pub mod polygon;
pub mod triangulate;

pub use error::{MeshError, RenderWarning};
pub use mesh::Mesh;
pub use polygon::Polygon;

use config::constants::PipelineConfig;
use layout_ir::{LayerGeometry, LayerId, LayerStack, Material};
use rayon::prelude::*;

use assemble::MeshAssembler;

/// The engine's sole artifact: mesh, material palette, and the warnings
/// accumulated along the way.
///
/// `palette[i]` is the material of every triangle whose tag is `i`;
/// palette order follows ascending layer identifier. Warnings are ordered
/// by layer as well.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// The assembled, deduplicated surface mesh.
    pub mesh: Mesh,
    /// Material palette indexed by the mesh's per-triangle tags.
    pub palette: Vec<Material>,
    /// Recoverable problems encountered during conversion.
    pub warnings: Vec<RenderWarning>,
}

/// One layer's share of the pipeline work, scheduled independently.
struct LayerJob<'a> {
    layer: LayerId,
    rings: &'a [Vec<glam::DVec2>],
    z_base: f64,
    thickness: f64,
    slot: u32,
}

struct LayerResult {
    layer: LayerId,
    mesh: Mesh,
    warnings: Vec<RenderWarning>,
}

/// Converts layout geometry and a layer stack into a surface mesh.
///
/// This is the main entry point for the extrusion pipeline.
///
/// The stack is validated up front; a malformed stack aborts before any
/// geometry work. Per-layer geometry problems (degenerate rings, failed
/// triangulations, layers without a stack entry) are skipped and reported
/// in [`RenderOutput::warnings`]; the mesh is best-effort over the
/// remaining geometry.
///
/// Output is deterministic: identical input produces an identical mesh
/// regardless of worker scheduling, with or without `config.parallel`.
///
/// # Arguments
///
/// * `geometry` - Raw per-layer rings from the layout decoder
/// * `stack` - Vertical placement and material per layer, already
///   via-resolved
/// * `config` - Tolerances and parallelism switch
pub fn render_to_mesh(
    geometry: &LayerGeometry,
    stack: &LayerStack,
    config: &PipelineConfig,
) -> Result<RenderOutput, MeshError> {
    stack.validate()?;

    let mut palette = Vec::new();
    let mut jobs = Vec::new();

    for layer in geometry.layers() {
        let Some(entry) = stack.get(layer) else {
            continue; // reported in layer order below
        };
        let slot = palette.len() as u32;
        palette.push(entry.material.clone());
        jobs.push(LayerJob {
            layer,
            rings: geometry.rings(layer),
            z_base: entry.z_base,
            thickness: entry.thickness,
            slot,
        });
    }

    let results: Vec<LayerResult> = if config.parallel {
        jobs.par_iter().map(|job| render_layer(job, config)).collect()
    } else {
        jobs.iter().map(|job| render_layer(job, config)).collect()
    };

    // Deterministic reduce: geometry layers in ascending order, welding
    // one layer at a time.
    let mut assembler = MeshAssembler::new(config.vertex_merge_epsilon);
    let mut warnings = Vec::new();
    let mut next_result = results.into_iter().peekable();

    for layer in geometry.layers() {
        match next_result.peek() {
            Some(result) if result.layer == layer => {
                let result = next_result.next().expect("peeked");
                warnings.extend(result.warnings);
                assembler.push(&result.mesh);
            }
            _ => warnings.push(RenderWarning::MissingStackEntry { layer }),
        }
    }

    for warning in &warnings {
        log::warn!("{warning}");
    }

    let mesh = assembler.finish();
    // Every triangle tag must resolve in the palette; anything else is an
    // internal defect, not bad input.
    if mesh.materials().iter().any(|&m| m as usize >= palette.len()) {
        return Err(MeshError::invalid_topology(
            "triangle material tag outside the palette",
            None,
        ));
    }

    Ok(RenderOutput {
        mesh,
        palette,
        warnings,
    })
}

/// Runs normalize → merge → triangulate → extrude for one layer.
///
/// Pure function of its inputs: no shared mutable state, so layers can be
/// scheduled in any order.
fn render_layer(job: &LayerJob<'_>, config: &PipelineConfig) -> LayerResult {
    let mut warnings = Vec::new();

    let polygons = normalize::normalize_layer(job.layer, job.rings, config, &mut warnings);
    let polygons = merge::merge_layer(polygons, config);

    if polygons.is_empty() {
        warnings.push(RenderWarning::EmptyLayer { layer: job.layer });
        return LayerResult {
            layer: job.layer,
            mesh: Mesh::new(),
            warnings,
        };
    }

    let mut mesh = Mesh::new();
    for polygon in &polygons {
        match triangulate::triangulate_polygon(polygon, config) {
            Ok(cap) => {
                let prism =
                    extrude::extrude_polygon(polygon, &cap, job.z_base, job.thickness, job.slot);
                mesh.merge(&prism);
            }
            Err(err) => warnings.push(RenderWarning::Triangulation {
                layer: job.layer,
                message: err.to_string(),
            }),
        }
    }

    LayerResult {
        layer: job.layer,
        mesh,
        warnings,
    }
}
