//! # Polygon Triangulator
//!
//! Ear clipping with hole support. Holes are first bridged into the outer
//! ring through mutually visible vertices (ray cast from the hole's
//! rightmost vertex, with reflex-vertex refinement), turning the polygon
//! into a single ring that a plain ear clipper can consume.
//!
//! Orientation predicates use adaptive-precision arithmetic
//! ([`robust::orient2d`]), so near-collinear layout data cannot flip an ear
//! test.

use glam::DVec2;
use robust::{orient2d, Coord};
use thiserror::Error;

use config::constants::PipelineConfig;

use crate::polygon::Polygon;

/// A triangulated polygon: flat cap geometry in the plane.
#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    /// Cap vertices. Bridged hole vertices appear twice; the assembler's
    /// deduplication collapses them later.
    pub points: Vec<DVec2>,
    /// Triangles indexing into `points`, counter-clockwise.
    pub triangles: Vec<[u32; 3]>,
}

impl Triangulation {
    /// Total area covered by the triangles.
    pub fn area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let (a, b, c) = (
                    self.points[t[0] as usize],
                    self.points[t[1] as usize],
                    self.points[t[2] as usize],
                );
                (b - a).perp_dot(c - a) / 2.0
            })
            .sum()
    }
}

/// Per-polygon triangulation failures.
///
/// These abort only the offending polygon; the caller records a warning
/// and continues with the rest of the layer.
#[derive(Debug, Error)]
pub enum TriangulateError {
    /// A hole's rightmost vertex sees no point of the outer ring, so no
    /// bridge exists. Valid merger output never produces this.
    #[error("no visible outer vertex for hole bridge")]
    NoVisibleVertex,

    /// The clipper found no ear with vertices remaining. Indicates
    /// self-intersecting or otherwise invalid boundary data.
    #[error("ear clipping stuck with {remaining} vertices remaining")]
    NoEarFound { remaining: usize },

    /// The clipped triangles do not cover the polygon's shoelace area.
    /// Raised for self-intersecting rings that still clip "successfully".
    #[error("triangulated area {computed} diverged from polygon area {expected}")]
    AreaMismatch { computed: f64, expected: f64 },
}

/// Triangulates a polygon with holes.
///
/// A polygon whose net area is below the area tolerance yields an empty
/// triangulation; that is a valid outcome, not an error.
pub fn triangulate_polygon(
    polygon: &Polygon,
    config: &PipelineConfig,
) -> Result<Triangulation, TriangulateError> {
    if polygon.area() <= config.area_epsilon {
        return Ok(Triangulation::default());
    }

    let ring = if polygon.has_holes() {
        bridge_holes(polygon)?
    } else {
        polygon.outer.clone()
    };

    let triangulation = clip_ears(ring, config)?;

    // Area conservation doubles as a self-intersection detector: a ring
    // with crossing edges clips into triangles whose total area cannot
    // match the shoelace area.
    let tolerance = config.area_epsilon * (triangulation.points.len() + 1) as f64;
    if (triangulation.area() - polygon.area()).abs() > tolerance {
        return Err(TriangulateError::AreaMismatch {
            computed: triangulation.area(),
            expected: polygon.area(),
        });
    }

    Ok(triangulation)
}

// =============================================================================
// HOLE BRIDGING
// =============================================================================

/// Merges all holes into the outer ring via bridge edges.
///
/// Holes are processed right-to-left (by rightmost vertex) so a hole can
/// bridge through previously inserted hole vertices. Each bridge
/// duplicates two vertices, leaving a single convex-combinable ring.
fn bridge_holes(polygon: &Polygon) -> Result<Vec<DVec2>, TriangulateError> {
    let mut combined = polygon.outer.clone();

    let mut holes: Vec<&Vec<DVec2>> = polygon.holes.iter().collect();
    holes.sort_by(|a, b| {
        let ax = rightmost(a).1.x;
        let bx = rightmost(b).1.x;
        bx.partial_cmp(&ax).unwrap_or(std::cmp::Ordering::Equal)
    });

    for hole in holes {
        let (m_index, m) = rightmost(hole);
        let bridge = find_bridge(&combined, m)?;

        // combined[..=bridge] + hole cycle from m back to m + bridge point.
        let mut next = Vec::with_capacity(combined.len() + hole.len() + 2);
        next.extend_from_slice(&combined[..=bridge]);
        for k in 0..=hole.len() {
            next.push(hole[(m_index + k) % hole.len()]);
        }
        next.extend_from_slice(&combined[bridge..]);
        combined = next;
    }

    Ok(combined)
}

/// Index and position of the ring vertex with maximum x (ties: maximum y).
fn rightmost(ring: &[DVec2]) -> (usize, DVec2) {
    let mut best = 0;
    for i in 1..ring.len() {
        if ring[i].x > ring[best].x || (ring[i].x == ring[best].x && ring[i].y > ring[best].y) {
            best = i;
        }
    }
    (best, ring[best])
}

/// Finds an outer-ring vertex visible from hole vertex `m`.
///
/// Casts a ray in +x from `m`, takes the closest intersected edge's
/// rightmost endpoint as the candidate, then refines against reflex
/// vertices inside the candidate triangle (the reflex vertex closest in
/// angle to the ray wins).
fn find_bridge(ring: &[DVec2], m: DVec2) -> Result<usize, TriangulateError> {
    let n = ring.len();
    let mut hit: Option<(usize, DVec2)> = None; // (edge start, intersection)

    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        if (a.y > m.y) == (b.y > m.y) {
            continue;
        }
        let x = a.x + (m.y - a.y) * (b.x - a.x) / (b.y - a.y);
        if x < m.x {
            continue;
        }
        if hit.map_or(true, |(_, p)| x < p.x) {
            hit = Some((i, DVec2::new(x, m.y)));
        }
    }

    let Some((edge, intersection)) = hit else {
        return Err(TriangulateError::NoVisibleVertex);
    };

    // Candidate: the intersected edge's endpoint with the larger x.
    let (s, e) = (edge, (edge + 1) % n);
    let mut candidate = if ring[s].x > ring[e].x { s } else { e };

    if (ring[candidate] - intersection).length() < 1e-12 {
        return Ok(candidate);
    }

    // Reflex vertices inside triangle (m, intersection, candidate) occlude
    // the candidate; the one closest in angle to the ray is visible.
    let mut best_tan = f64::INFINITY;
    let mut best_dist = f64::INFINITY;
    for i in 0..n {
        if i == candidate {
            continue;
        }
        let prev = ring[(i + n - 1) % n];
        let cur = ring[i];
        let next = ring[(i + 1) % n];
        if orientation(prev, cur, next) >= 0.0 {
            continue; // convex
        }
        if !point_in_triangle(cur, m, intersection, ring[candidate]) {
            continue;
        }
        let dx = cur.x - m.x;
        if dx <= 0.0 {
            continue;
        }
        let tan = (cur.y - m.y).abs() / dx;
        let dist = cur.distance(m);
        if tan < best_tan || (tan == best_tan && dist < best_dist) {
            best_tan = tan;
            best_dist = dist;
            candidate = i;
        }
    }

    Ok(candidate)
}

// =============================================================================
// EAR CLIPPING
// =============================================================================

/// Clips ears off a counter-clockwise ring until three vertices remain.
fn clip_ears(ring: Vec<DVec2>, config: &PipelineConfig) -> Result<Triangulation, TriangulateError> {
    let mut triangulation = Triangulation {
        points: ring,
        triangles: Vec::new(),
    };
    let points = &triangulation.points;

    let mut active: Vec<u32> = (0..points.len() as u32).collect();

    while active.len() > 3 {
        let mut clipped = false;

        for slot in 0..active.len() {
            let prev = active[(slot + active.len() - 1) % active.len()];
            let cur = active[slot];
            let next = active[(slot + 1) % active.len()];

            if !is_ear(points, &active, prev, cur, next) {
                continue;
            }

            // Skip zero-area ears (collapsed bridge slivers) but still
            // remove the vertex.
            let area = (points[next as usize] - points[prev as usize])
                .perp_dot(points[cur as usize] - points[prev as usize])
                .abs()
                / 2.0;
            if area > config.area_epsilon {
                triangulation.triangles.push([prev, cur, next]);
            }
            active.remove(slot);
            clipped = true;
            break;
        }

        if !clipped {
            return Err(TriangulateError::NoEarFound {
                remaining: active.len(),
            });
        }
    }

    if active.len() == 3 {
        let (a, b, c) = (active[0], active[1], active[2]);
        if orientation(points[a as usize], points[b as usize], points[c as usize]) > 0.0 {
            triangulation.triangles.push([a, b, c]);
        }
    }

    Ok(triangulation)
}

/// Ear test: convex corner with no other active vertex inside.
fn is_ear(points: &[DVec2], active: &[u32], prev: u32, cur: u32, next: u32) -> bool {
    let (a, b, c) = (
        points[prev as usize],
        points[cur as usize],
        points[next as usize],
    );

    if orientation(a, b, c) <= 0.0 {
        return false; // reflex or collinear
    }

    for &other in active {
        if other == prev || other == cur || other == next {
            continue;
        }
        let p = points[other as usize];
        // Duplicated bridge vertices coincide with corners; not blockers.
        if p == a || p == b || p == c {
            continue;
        }
        if point_in_triangle(p, a, b, c) {
            return false;
        }
    }

    true
}

/// Exact orientation predicate: positive for counter-clockwise.
fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    orient2d(
        Coord { x: a.x, y: a.y },
        Coord { x: b.x, y: b.y },
        Coord { x: c.x, y: c.y },
    )
}

/// True if `p` lies inside or on the counter-clockwise triangle `(a, b, c)`.
fn point_in_triangle(p: DVec2, a: DVec2, b: DVec2, c: DVec2) -> bool {
    orientation(a, b, p) >= 0.0 && orientation(b, c, p) >= 0.0 && orientation(c, a, p) >= 0.0
}
