//! # 2D Polygon With Holes
//!
//! The engine-internal polygon aggregate: one outer ring plus zero or more
//! hole rings, with the shared 2D predicates used across normalization,
//! merging, and triangulation.
//!
//! Winding convention (system-wide): outer rings counter-clockwise, hole
//! rings clockwise.

use glam::DVec2;

/// A polygon with an outer boundary and optional holes.
///
/// Holes lie strictly inside the outer ring and do not touch each other.
/// This is an explicit aggregate, not a ring subtype: a ring on its own is
/// just a `Vec<DVec2>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Outer boundary, counter-clockwise.
    pub outer: Vec<DVec2>,
    /// Holes, each clockwise.
    pub holes: Vec<Vec<DVec2>>,
}

impl Polygon {
    /// Creates a polygon from an outer boundary.
    pub fn new(outer: Vec<DVec2>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Creates a polygon with holes.
    pub fn with_holes(outer: Vec<DVec2>, holes: Vec<Vec<DVec2>>) -> Self {
        Self { outer, holes }
    }

    /// Axis-aligned rectangle, counter-clockwise. Test helper and decoder
    /// convenience.
    pub fn rect(min: DVec2, max: DVec2) -> Self {
        Self::new(vec![
            min,
            DVec2::new(max.x, min.y),
            max,
            DVec2::new(min.x, max.y),
        ])
    }

    /// Net enclosed area: outer area minus hole areas.
    pub fn area(&self) -> f64 {
        let outer = signed_area(&self.outer).abs();
        let holes: f64 = self.holes.iter().map(|h| signed_area(h).abs()).sum();
        outer - holes
    }

    /// Returns true if the polygon has holes.
    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }
}

/// Signed area of a ring via the shoelace formula.
///
/// Positive for counter-clockwise winding, negative for clockwise.
pub fn signed_area(ring: &[DVec2]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        sum += ring[j].x * ring[i].y - ring[i].x * ring[j].y;
        j = i;
    }
    sum / 2.0
}

/// Even-odd point-in-ring test (crossing number).
///
/// Points exactly on the boundary are not guaranteed either answer; callers
/// that care pick representative points away from boundaries.
pub fn ring_contains(ring: &[DVec2], point: DVec2) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let pi = ring[i];
        let pj = ring[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x = pi.x + (point.y - pi.y) * (pj.x - pi.x) / (pj.y - pi.y);
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
