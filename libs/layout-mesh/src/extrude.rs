//! # Prism Extruder
//!
//! Turns one flat polygon into a closed prism between two z planes: the
//! cap triangulation becomes the top and bottom faces, and every boundary
//! edge (outer and hole rings alike) becomes a two-triangle side wall.
//!
//! With the canonical winding (outer counter-clockwise, holes clockwise)
//! every emitted triangle faces outward: top +z, bottom -z, side walls
//! along the edge's right-hand normal.

use glam::{DVec2, DVec3};

use crate::mesh::Mesh;
use crate::polygon::Polygon;
use crate::triangulate::Triangulation;

/// Extrudes a triangulated polygon into a prism.
///
/// `thickness` must be positive; the stack validator rejects anything else
/// before geometry work starts. An empty cap yields an empty mesh.
///
/// # Arguments
///
/// * `polygon` - Boundary rings, canonical winding
/// * `cap` - Triangulation of the polygon's interior
/// * `z_base` - Bottom face height
/// * `thickness` - Extrusion height (positive)
/// * `material` - Palette slot tag for every emitted triangle
pub fn extrude_polygon(
    polygon: &Polygon,
    cap: &Triangulation,
    z_base: f64,
    thickness: f64,
    material: u32,
) -> Mesh {
    if cap.triangles.is_empty() {
        return Mesh::new();
    }

    let z_top = z_base + thickness;
    let side_edges = polygon.outer.len() + polygon.holes.iter().map(Vec::len).sum::<usize>();
    let mut mesh = Mesh::with_capacity(
        cap.points.len() * 2 + side_edges * 4,
        cap.triangles.len() * 2 + side_edges * 2,
    );

    // Bottom cap vertices, then top cap vertices.
    for &p in &cap.points {
        mesh.add_vertex(DVec3::new(p.x, p.y, z_base));
    }
    let top_offset = cap.points.len() as u32;
    for &p in &cap.points {
        mesh.add_vertex(DVec3::new(p.x, p.y, z_top));
    }

    for tri in &cap.triangles {
        // Bottom faces -z: reverse the counter-clockwise cap winding.
        mesh.add_triangle(tri[0], tri[2], tri[1], material);
        // Top faces +z: winding preserved.
        mesh.add_triangle(
            top_offset + tri[0],
            top_offset + tri[1],
            top_offset + tri[2],
            material,
        );
    }

    side_walls(&mut mesh, &polygon.outer, z_base, z_top, material);
    for hole in &polygon.holes {
        side_walls(&mut mesh, hole, z_base, z_top, material);
    }

    mesh
}

/// Emits two outward-facing triangles per ring edge.
fn side_walls(mesh: &mut Mesh, ring: &[DVec2], z_base: f64, z_top: f64, material: u32) {
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        if a == b {
            continue;
        }

        let bottom_a = mesh.add_vertex(DVec3::new(a.x, a.y, z_base));
        let bottom_b = mesh.add_vertex(DVec3::new(b.x, b.y, z_base));
        let top_b = mesh.add_vertex(DVec3::new(b.x, b.y, z_top));
        let top_a = mesh.add_vertex(DVec3::new(a.x, a.y, z_top));

        mesh.add_triangle(bottom_a, bottom_b, top_b, material);
        mesh.add_triangle(bottom_a, top_b, top_a, material);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulate::triangulate_polygon;
    use config::constants::PipelineConfig;

    fn extrude(polygon: &Polygon, z_base: f64, thickness: f64) -> Mesh {
        let cap = triangulate_polygon(polygon, &PipelineConfig::default()).unwrap();
        extrude_polygon(polygon, &cap, z_base, thickness, 0)
    }

    fn square(min: f64, max: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(min, min),
            DVec2::new(max, min),
            DVec2::new(max, max),
            DVec2::new(min, max),
        ]
    }

    #[test]
    fn test_extrude_square_triangle_count() {
        // 2 bottom + 2 top + 4 edges x 2 sides.
        let mesh = extrude(&Polygon::new(square(0.0, 2.0)), 0.0, 1.0);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.validate(1.0e-9));
    }

    #[test]
    fn test_extrude_z_range() {
        let mesh = extrude(&Polygon::new(square(0.0, 2.0)), 1.5, 0.5);
        let (min, max) = mesh.bounding_box();
        assert!((min.z - 1.5).abs() < 1e-12);
        assert!((max.z - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_extrude_with_hole_side_count() {
        let mut hole = square(1.0, 3.0);
        hole.reverse();
        let polygon = Polygon::with_holes(square(0.0, 4.0), vec![hole]);
        let mesh = extrude(&polygon, 0.0, 1.0);

        // 4 outer + 4 hole edges, 2 triangles each.
        let cap_triangles = mesh
            .triangles()
            .iter()
            .filter(|t| {
                let z = mesh.vertex(t[0]).z;
                (mesh.vertex(t[1]).z - z).abs() < 1e-12 && (mesh.vertex(t[2]).z - z).abs() < 1e-12
            })
            .count();
        let side_triangles = mesh.triangle_count() - cap_triangles;
        assert_eq!(side_triangles, 16);
        assert!(mesh.validate(1.0e-9));
    }

    #[test]
    fn test_extrude_caps_face_out() {
        let polygon = Polygon::new(square(0.0, 1.0));
        let mesh = extrude(&polygon, 0.0, 2.0);

        for (i, tri) in mesh.triangles().iter().enumerate() {
            let v0 = mesh.vertex(tri[0]);
            let v1 = mesh.vertex(tri[1]);
            let v2 = mesh.vertex(tri[2]);
            let normal = (v1 - v0).cross(v2 - v0);
            let z = (v0.z + v1.z + v2.z) / 3.0;
            if normal.z.abs() > 1e-9 {
                // Cap triangle: bottom faces -z, top faces +z.
                if z < 1.0 {
                    assert!(normal.z < 0.0, "bottom cap triangle {i} faces up");
                } else {
                    assert!(normal.z > 0.0, "top cap triangle {i} faces down");
                }
            } else {
                // Side triangle: outward from the unit square center.
                let center = (v0 + v1 + v2) / 3.0 - DVec3::new(0.5, 0.5, z);
                assert!(
                    normal.dot(DVec3::new(center.x, center.y, 0.0)) > 0.0,
                    "side triangle {i} faces inward"
                );
            }
        }
    }

    #[test]
    fn test_extrude_empty_cap() {
        let polygon = Polygon::new(Vec::new());
        let mesh = extrude_polygon(&polygon, &Triangulation::default(), 0.0, 1.0, 0);
        assert!(mesh.is_empty());
    }
}
