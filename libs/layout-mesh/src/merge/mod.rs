//! # 2D Layer Merger
//!
//! Boolean union of all polygons on one layer, via a planar BSP pipeline:
//!
//! - [`line`] / [`segment`]: splitting line and directed boundary edge
//! - [`bsp`]: iterative 2D BSP tree with clip and invert
//! - [`chain`]: ring reassembly from clipped segment soup
//!
//! Polygons are first grouped by actual interior overlap; only interacting
//! groups are unioned. Touching-but-not-overlapping polygons therefore stay
//! separate, and isolated polygons pass through unchanged (union is
//! idempotent on already-merged input).

pub mod bsp;
pub mod chain;
pub mod line;
pub mod segment;

use config::constants::PipelineConfig;
use glam::DVec2;

use crate::polygon::Polygon;

use self::bsp::BspNode;
use self::chain::{assemble_polygons, chain_rings};
use self::segment::Segment;

/// Converts a polygon's boundary into directed segments.
///
/// Outer (counter-clockwise) and hole (clockwise) rings both yield edges
/// whose solid side is on the left, so one soup describes the whole region.
fn polygon_segments(polygon: &Polygon) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(
        polygon.outer.len() + polygon.holes.iter().map(Vec::len).sum::<usize>(),
    );
    ring_segments(&polygon.outer, &mut segments);
    for hole in &polygon.holes {
        ring_segments(hole, &mut segments);
    }
    segments
}

fn ring_segments(ring: &[DVec2], out: &mut Vec<Segment>) {
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        if let Some(seg) = Segment::from_points(a, b) {
            out.push(seg);
        }
    }
}

/// Boolean union of two boundary soups (csg.js recipe on the 2D tree).
fn union_segments(a: Vec<Segment>, b: Vec<Segment>, epsilon: f64) -> Vec<Segment> {
    if a.is_empty() {
        return b;
    }
    if b.is_empty() {
        return a;
    }

    let mut tree_a = BspNode::new(a, epsilon);
    let mut tree_b = BspNode::new(b, epsilon);

    tree_a.clip_to(&tree_b, epsilon);
    tree_b.clip_to(&tree_a, epsilon);
    tree_b.invert();
    tree_b.clip_to(&tree_a, epsilon);
    tree_b.invert();

    let mut result = tree_a.all_segments();
    result.extend(tree_b.all_segments());
    result
}

/// Boolean intersection of two boundary soups (csg.js recipe).
fn intersect_segments(a: Vec<Segment>, b: Vec<Segment>, epsilon: f64) -> Vec<Segment> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let mut tree_a = BspNode::new(a, epsilon);
    let mut tree_b = BspNode::new(b, epsilon);

    tree_a.invert();
    tree_b.clip_to(&tree_a, epsilon);
    tree_b.invert();
    tree_a.clip_to(&tree_b, epsilon);
    tree_b.clip_to(&tree_a, epsilon);

    let mut result = tree_a.all_segments();
    result.extend(tree_b.all_segments());
    for seg in &mut result {
        *seg = seg.flip();
    }
    result
}

/// Signed area enclosed by a boundary soup.
///
/// Valid for any closed boundary regardless of segment order, since the
/// shoelace term of each directed edge is order-independent.
fn segments_area(segments: &[Segment]) -> f64 {
    segments
        .iter()
        .map(|s| s.a.perp_dot(s.b))
        .sum::<f64>()
        / 2.0
}

/// Axis-aligned bounding box of a polygon's outer ring.
fn polygon_bounds(polygon: &Polygon) -> (DVec2, DVec2) {
    let mut min = polygon.outer[0];
    let mut max = polygon.outer[0];
    for &p in &polygon.outer[1..] {
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

fn bounds_overlap(a: (DVec2, DVec2), b: (DVec2, DVec2), epsilon: f64) -> bool {
    a.0.x <= b.1.x + epsilon
        && b.0.x <= a.1.x + epsilon
        && a.0.y <= b.1.y + epsilon
        && b.0.y <= a.1.y + epsilon
}

/// True if some hole of `a` is (almost) fully covered by `b`.
///
/// An exact fill shares boundary with the hole without interior overlap,
/// so the plain intersection test misses it; the union must still close
/// the hole.
fn covers_hole(a: &Polygon, b: &Polygon, config: &PipelineConfig) -> bool {
    for hole in &a.holes {
        let hole_area = crate::polygon::signed_area(hole).abs();
        if hole_area <= config.area_epsilon {
            continue;
        }
        // Hole region as a CCW soup.
        let mut reversed: Vec<DVec2> = hole.clone();
        reversed.reverse();
        let mut region = Vec::new();
        ring_segments(&reversed, &mut region);

        let covered = intersect_segments(
            region,
            polygon_segments(b),
            config.grid_epsilon,
        );
        if segments_area(&covered) >= hole_area - config.area_epsilon {
            return true;
        }
    }
    false
}

/// True if the two polygons' union must be computed jointly.
fn interacts(a: &Polygon, b: &Polygon, config: &PipelineConfig) -> bool {
    if !bounds_overlap(
        polygon_bounds(a),
        polygon_bounds(b),
        config.grid_epsilon,
    ) {
        return false;
    }

    let overlap = intersect_segments(
        polygon_segments(a),
        polygon_segments(b),
        config.grid_epsilon,
    );
    if segments_area(&overlap) > config.area_epsilon {
        return true;
    }

    covers_hole(a, b, config) || covers_hole(b, a, config)
}

/// Union-find over polygon indices.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut walk = i;
        while self.parent[walk] != root {
            let next = self.parent[walk];
            self.parent[walk] = root;
            walk = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Lower root wins, keeping group ids deterministic.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

/// Merges all polygons of one layer into non-overlapping polygons.
///
/// Overlapping polygons are grouped and unioned; polygons that only touch
/// or are disjoint pass through unchanged. Output order is deterministic
/// (sorted by minimum outer vertex).
pub fn merge_layer(polygons: Vec<Polygon>, config: &PipelineConfig) -> Vec<Polygon> {
    if polygons.len() <= 1 {
        return polygons;
    }

    let mut sets = DisjointSets::new(polygons.len());
    for i in 0..polygons.len() {
        for j in (i + 1)..polygons.len() {
            if sets.find(i) != sets.find(j) && interacts(&polygons[i], &polygons[j], config) {
                sets.union(i, j);
            }
        }
    }

    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); polygons.len()];
    for i in 0..polygons.len() {
        let root = sets.find(i);
        groups[root].push(i);
    }

    let mut result = Vec::new();
    for group in groups.into_iter().filter(|g| !g.is_empty()) {
        if group.len() == 1 {
            result.push(polygons[group[0]].clone());
            continue;
        }

        let mut soup = Vec::new();
        for &i in &group {
            soup = union_segments(
                soup,
                polygon_segments(&polygons[i]),
                config.grid_epsilon,
            );
        }

        let rings = chain_rings(soup, config.grid_epsilon);
        result.extend(assemble_polygons(rings, config.area_epsilon));
    }

    result.sort_by(|a, b| {
        let ka = polygon_bounds(a).0;
        let kb = polygon_bounds(b).0;
        ka.x.partial_cmp(&kb.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(ka.y.partial_cmp(&kb.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::signed_area;

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon {
        Polygon::rect(DVec2::new(min_x, min_y), DVec2::new(max_x, max_y))
    }

    fn total_area(polygons: &[Polygon]) -> f64 {
        polygons.iter().map(Polygon::area).sum()
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_layer(Vec::new(), &config()).is_empty());
    }

    #[test]
    fn test_merge_single_passthrough() {
        let input = rect(0.0, 0.0, 2.0, 1.0);
        let merged = merge_layer(vec![input.clone()], &config());
        assert_eq!(merged, vec![input]);
    }

    #[test]
    fn test_merge_disjoint_stay_separate() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(5.0, 5.0, 6.0, 6.0);
        let merged = merge_layer(vec![a.clone(), b.clone()], &config());
        assert_eq!(merged.len(), 2);
        assert!((total_area(&merged) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge_touching_stay_separate() {
        // Share the edge x=1 but no interior.
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 0.0, 2.0, 1.0);
        let merged = merge_layer(vec![a, b], &config());
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_overlapping_squares() {
        // Two 2x2 squares overlapping in a 1x1 region: union area 7.
        let a = rect(0.0, 0.0, 2.0, 2.0);
        let b = rect(1.0, 1.0, 3.0, 3.0);
        let merged = merge_layer(vec![a, b], &config());
        assert_eq!(merged.len(), 1);
        assert!((merged[0].area() - 7.0).abs() < 1e-6);
        assert!(signed_area(&merged[0].outer) > 0.0);
    }

    #[test]
    fn test_merge_partial_overlap_keeps_protruding_area() {
        // The smaller rectangle protrudes from the bigger one on the
        // right; the protruding part must survive the union.
        let a = rect(6.5, 2.5, 9.5, 4.0);
        let b = rect(5.0, 2.0, 8.0, 5.0);
        let merged = merge_layer(vec![a, b], &config());
        assert_eq!(merged.len(), 1);
        // 4.5 + 9.0 - 2.25 overlap.
        assert!((merged[0].area() - 11.25).abs() < 1e-6);
    }

    #[test]
    fn test_merge_contained_is_absorbed() {
        let big = rect(0.0, 0.0, 4.0, 4.0);
        let small = rect(1.0, 1.0, 2.0, 2.0);
        let merged = merge_layer(vec![big, small], &config());
        assert_eq!(merged.len(), 1);
        assert!((merged[0].area() - 16.0).abs() < 1e-6);
        assert!(!merged[0].has_holes());
    }

    #[test]
    fn test_merge_idempotent() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        let b = rect(1.0, 0.0, 3.0, 2.0);
        let once = merge_layer(vec![a, b], &config());
        let twice = merge_layer(once.clone(), &config());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_closes_exactly_filled_hole() {
        // Frame with a 1..3 square hole, plus a square filling that hole
        // exactly. They share boundary only, yet the union is solid.
        let frame = Polygon::with_holes(
            rect(0.0, 0.0, 4.0, 4.0).outer,
            vec![{
                let mut hole = rect(1.0, 1.0, 3.0, 3.0).outer;
                hole.reverse();
                hole
            }],
        );
        let fill = rect(1.0, 1.0, 3.0, 3.0);

        let merged = merge_layer(vec![frame, fill], &config());
        assert_eq!(merged.len(), 1);
        assert!(!merged[0].has_holes());
        assert!((merged[0].area() - 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_merge_overlap_creates_hole() {
        // Four bars forming a closed frame around an empty 1..3 window.
        let bars = vec![
            rect(0.0, 0.0, 4.0, 1.0),
            rect(0.0, 3.0, 4.0, 4.0),
            rect(0.0, 0.0, 1.0, 4.0),
            rect(3.0, 0.0, 4.0, 4.0),
        ];
        let merged = merge_layer(bars, &config());
        assert_eq!(merged.len(), 1);
        assert!(merged[0].has_holes());
        assert!((merged[0].area() - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_merge_three_way_chain() {
        // a overlaps b, b overlaps c, a and c are disjoint: one group.
        let a = rect(0.0, 0.0, 2.0, 1.0);
        let b = rect(1.5, 0.0, 3.5, 1.0);
        let c = rect(3.0, 0.0, 5.0, 1.0);
        let merged = merge_layer(vec![a, b, c], &config());
        assert_eq!(merged.len(), 1);
        assert!((merged[0].area() - 5.0).abs() < 1e-6);
    }
}
