//! # Ring Reassembly
//!
//! Turns the segment soup left by boolean clipping back into closed rings
//! and polygons. Segment endpoints are matched through quantized keys so
//! the split points introduced by clipping chain up despite floating-point
//! noise; collinear vertices from those splits are eliminated afterwards.

use std::collections::HashMap;

use glam::DVec2;

use crate::polygon::{ring_contains, signed_area, Polygon};

use super::segment::Segment;

/// Quantized endpoint key for chaining.
fn key(point: DVec2, epsilon: f64) -> (i64, i64) {
    (
        (point.x / epsilon).round() as i64,
        (point.y / epsilon).round() as i64,
    )
}

/// Chains segments end-to-end into closed rings.
///
/// Endpoints are matched within `epsilon`. Chains that fail to close or
/// close with fewer than 3 points are dropped; boolean output on valid
/// input always closes, so leftovers are numerical debris.
pub fn chain_rings(segments: Vec<Segment>, epsilon: f64) -> Vec<Vec<DVec2>> {
    let mut segments = segments;
    // Deterministic walk order regardless of BSP traversal order.
    segments.sort_by_key(|s| (key(s.a, epsilon), key(s.b, epsilon)));

    let mut by_start: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, seg) in segments.iter().enumerate() {
        by_start.entry(key(seg.a, epsilon)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut rings = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let mut ring = vec![segments[start].a];
        let mut cursor = segments[start].b;
        let target = segments[start].a;
        let mut closed = false;

        loop {
            if cursor.distance(target) < epsilon {
                closed = true;
                break;
            }
            match next_unused(&segments, &by_start, &used, cursor, epsilon) {
                Some(next) => {
                    used[next] = true;
                    ring.push(segments[next].a);
                    cursor = segments[next].b;
                }
                None => break,
            }
        }

        if !closed {
            continue;
        }

        let ring = drop_collinear(ring, epsilon);
        if ring.len() >= 3 {
            rings.push(ring);
        }
    }

    rings
}

/// Finds an unused segment starting within `epsilon` of `point`.
///
/// Looks up the point's quantized bucket and its 8 neighbors, so matches
/// straddling a bucket boundary are not missed.
fn next_unused(
    segments: &[Segment],
    by_start: &HashMap<(i64, i64), Vec<usize>>,
    used: &[bool],
    point: DVec2,
    epsilon: f64,
) -> Option<usize> {
    let (kx, ky) = key(point, epsilon);
    let mut best: Option<(usize, f64)> = None;

    for dx in -1..=1 {
        for dy in -1..=1 {
            let Some(candidates) = by_start.get(&(kx + dx, ky + dy)) else {
                continue;
            };
            for &i in candidates {
                if used[i] {
                    continue;
                }
                let dist = segments[i].a.distance(point);
                if dist < epsilon && best.map_or(true, |(_, d)| dist < d) {
                    best = Some((i, dist));
                }
            }
        }
    }

    best.map(|(i, _)| i)
}

/// Removes vertices lying within `epsilon` of the line through their
/// neighbors, including across the ring closure.
fn drop_collinear(ring: Vec<DVec2>, epsilon: f64) -> Vec<DVec2> {
    let mut out: Vec<DVec2> = Vec::with_capacity(ring.len());

    for p in ring {
        out.push(p);
        while out.len() >= 3 && is_collinear(out[out.len() - 3], out[out.len() - 2], p, epsilon) {
            out.remove(out.len() - 2);
        }
    }

    // Wrap-around: first and last vertices can also be redundant.
    while out.len() >= 3 && is_collinear(out[out.len() - 2], out[out.len() - 1], out[0], epsilon) {
        out.pop();
    }
    while out.len() >= 3 && is_collinear(*out.last().expect("len checked"), out[0], out[1], epsilon)
    {
        out.remove(0);
    }

    out
}

/// True if `b` lies within `epsilon` of the line through `a` and `c`.
fn is_collinear(a: DVec2, b: DVec2, c: DVec2, epsilon: f64) -> bool {
    let ac = c - a;
    let length = ac.length();
    if length < epsilon {
        return true;
    }
    ((b - a).perp_dot(ac) / length).abs() < epsilon
}

/// Groups closed rings into polygons by winding and containment.
///
/// Boolean output carries meaningful winding: counter-clockwise rings are
/// outer boundaries, clockwise rings are holes of their innermost
/// containing outer. Rings below the area tolerance are discarded.
pub fn assemble_polygons(rings: Vec<Vec<DVec2>>, area_epsilon: f64) -> Vec<Polygon> {
    let mut outers: Vec<(Vec<DVec2>, f64)> = Vec::new();
    let mut holes: Vec<Vec<DVec2>> = Vec::new();

    for ring in rings {
        let area = signed_area(&ring);
        if area.abs() <= area_epsilon {
            continue;
        }
        if area > 0.0 {
            outers.push((ring, area));
        } else {
            holes.push(ring);
        }
    }

    let mut polygons: Vec<Polygon> = outers
        .iter()
        .map(|(ring, _)| Polygon::new(ring.clone()))
        .collect();

    for hole in holes {
        let representative = hole[0];
        // Innermost containing outer: smallest area wins.
        let parent = outers
            .iter()
            .enumerate()
            .filter(|(_, (outer, _))| ring_contains(outer, representative))
            .min_by(|a, b| {
                a.1 .1
                    .partial_cmp(&b.1 .1)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i);
        if let Some(parent) = parent {
            polygons[parent].holes.push(hole);
        }
    }

    polygons
}
