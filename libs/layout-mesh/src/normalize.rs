//! # Polygon Normalizer
//!
//! Canonicalizes raw decoder rings: snaps near-duplicate points, fixes
//! winding, and classifies rings into outer boundaries and holes.
//!
//! Raw rings arrive with arbitrary winding and integer-quantization noise.
//! After normalization every outer ring is counter-clockwise, every hole is
//! clockwise and attached to its innermost containing outer ring.

use config::constants::PipelineConfig;
use glam::DVec2;
use layout_ir::LayerId;

use crate::error::RenderWarning;
use crate::polygon::{ring_contains, signed_area, Polygon};

/// Normalizes all raw rings of one layer into polygons with holes.
///
/// Rings that collapse below 3 distinct points, or whose area falls below
/// the area tolerance, are dropped with a [`RenderWarning::DegenerateRing`].
/// An empty result is a valid outcome for a layer.
pub fn normalize_layer(
    layer: LayerId,
    rings: &[Vec<DVec2>],
    config: &PipelineConfig,
    warnings: &mut Vec<RenderWarning>,
) -> Vec<Polygon> {
    let mut snapped: Vec<Vec<DVec2>> = Vec::with_capacity(rings.len());

    for ring in rings {
        let ring = snap_ring(ring, config.grid_epsilon);
        if ring.len() < 3 || signed_area(&ring).abs() <= config.area_epsilon {
            warnings.push(RenderWarning::DegenerateRing {
                layer,
                points: ring.len(),
            });
            continue;
        }
        snapped.push(ring);
    }

    classify_rings(snapped)
}

/// Collapses runs of points closer than `epsilon` to one representative
/// point and drops the resulting degenerate edges.
///
/// The implicit closing edge is snapped too: a last point within `epsilon`
/// of the first is removed.
pub fn snap_ring(points: &[DVec2], epsilon: f64) -> Vec<DVec2> {
    let mut out: Vec<DVec2> = Vec::with_capacity(points.len());

    for &p in points {
        match out.last() {
            Some(&last) if last.distance(p) < epsilon => continue,
            _ => out.push(p),
        }
    }

    while out.len() >= 2 {
        let first = out[0];
        let last = *out.last().expect("len checked");
        if first.distance(last) < epsilon {
            out.pop();
        } else {
            break;
        }
    }

    out
}

/// Groups standalone rings into polygons by containment depth.
///
/// Rings are sorted by descending area; a ring contained in an even number
/// of larger rings is an outer boundary, an odd number makes it a hole of
/// its innermost containing outer. Winding is fixed to the system
/// convention (outer CCW, holes CW).
fn classify_rings(rings: Vec<Vec<DVec2>>) -> Vec<Polygon> {
    let mut sorted: Vec<(Vec<DVec2>, f64)> = rings
        .into_iter()
        .map(|ring| {
            let area = signed_area(&ring).abs();
            (ring, area)
        })
        .collect();
    // Descending by area so parents precede children; ties broken by the
    // first vertex for reproducible output.
    sorted.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let (pa, pb) = (a.0[0], b.0[0]);
                pa.x.partial_cmp(&pb.x)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(pa.y.partial_cmp(&pb.y).unwrap_or(std::cmp::Ordering::Equal))
            })
    });

    let mut polygons: Vec<Polygon> = Vec::new();
    // (ring copy, owning polygon index or None for holes)
    let mut placed: Vec<(Vec<DVec2>, Option<usize>, f64)> = Vec::new();

    for (mut ring, area) in sorted {
        let representative = ring[0];
        let depth = placed
            .iter()
            .filter(|(outer, _, _)| ring_contains(outer, representative))
            .count();

        if depth % 2 == 0 {
            if signed_area(&ring) < 0.0 {
                ring.reverse();
            }
            placed.push((ring.clone(), Some(polygons.len()), area));
            polygons.push(Polygon::new(ring));
        } else {
            if signed_area(&ring) > 0.0 {
                ring.reverse();
            }
            // Innermost containing outer: smallest area wins.
            let parent = placed
                .iter()
                .filter(|(outer, owner, _)| {
                    owner.is_some() && ring_contains(outer, representative)
                })
                .min_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
                .and_then(|(_, owner, _)| *owner);
            if let Some(parent) = parent {
                placed.push((ring.clone(), None, area));
                polygons[parent].holes.push(ring);
            }
        }
    }

    polygons
}
