//! End-to-end pipeline tests: geometry + stack in, mesh + warnings out.

use config::constants::PipelineConfig;
use glam::DVec2;
use layout_ir::{LayerGeometry, LayerId, LayerKind, LayerStack, LayerStackEntry, Material};
use layout_mesh::{render_to_mesh, Mesh, RenderWarning};

const MET1: LayerId = LayerId::new(2, 0);

fn entry(name: &str, z_base: f64, thickness: f64) -> LayerStackEntry {
    LayerStackEntry {
        name: name.to_string(),
        kind: LayerKind::Routing,
        z_base,
        thickness,
        material: Material::new("copper", [183, 119, 41, 255]),
        connects: None,
    }
}

fn square(min: f64, max: f64) -> Vec<DVec2> {
    vec![
        DVec2::new(min, min),
        DVec2::new(max, min),
        DVec2::new(max, max),
        DVec2::new(min, max),
    ]
}

fn single_layer_stack(z_base: f64, thickness: f64) -> LayerStack {
    let mut stack = LayerStack::new();
    stack.insert(MET1, entry("met1", z_base, thickness));
    stack
}

/// Triangles whose three vertices share one z value.
fn cap_triangle_count(mesh: &Mesh) -> usize {
    mesh.triangles()
        .iter()
        .filter(|t| {
            let z = mesh.vertex(t[0]).z;
            (mesh.vertex(t[1]).z - z).abs() < 1e-12 && (mesh.vertex(t[2]).z - z).abs() < 1e-12
        })
        .count()
}

/// Area of the cap at height `z`.
fn cap_area(mesh: &Mesh, z: f64) -> f64 {
    mesh.triangles()
        .iter()
        .filter(|t| {
            (0..3).all(|i| (mesh.vertex(t[i]).z - z).abs() < 1e-12)
        })
        .map(|t| {
            let (a, b, c) = (mesh.vertex(t[0]), mesh.vertex(t[1]), mesh.vertex(t[2]));
            (b - a).cross(c - a).length() / 2.0
        })
        .sum()
}

#[test]
fn overlapping_squares_merge_into_one_prism() {
    // Two overlapping unit squares union into one 1.5 x 1 rectangle:
    // 4 cap triangles plus 4 edges x 2 side triangles.
    let mut geometry = LayerGeometry::new();
    geometry.push_ring(MET1, square(0.0, 1.0));
    geometry.push_ring(
        MET1,
        vec![
            DVec2::new(0.5, 0.0),
            DVec2::new(1.5, 0.0),
            DVec2::new(1.5, 1.0),
            DVec2::new(0.5, 1.0),
        ],
    );

    let output = render_to_mesh(
        &geometry,
        &single_layer_stack(0.0, 1.0),
        &PipelineConfig::default(),
    )
    .unwrap();

    assert_eq!(output.mesh.triangle_count(), 12);
    assert!((cap_area(&output.mesh, 1.0) - 1.5).abs() < 1e-6);
    assert!(output.warnings.is_empty());
    assert!(output.mesh.validate(1.0e-9));
}

#[test]
fn hole_gets_cap_opening_and_inner_walls() {
    // 4x4 square with concentric 2x2 hole, thickness 2.
    let mut geometry = LayerGeometry::new();
    geometry.push_ring(MET1, square(0.0, 4.0));
    geometry.push_ring(MET1, square(1.0, 3.0));

    let output = render_to_mesh(
        &geometry,
        &single_layer_stack(0.0, 2.0),
        &PipelineConfig::default(),
    )
    .unwrap();

    let caps = cap_triangle_count(&output.mesh);
    let sides = output.mesh.triangle_count() - caps;

    assert!(caps > 0);
    // Cap area is outer minus hole, on both faces.
    assert!((cap_area(&output.mesh, 0.0) - 12.0).abs() < 1e-6);
    assert!((cap_area(&output.mesh, 2.0) - 12.0).abs() < 1e-6);
    // 4 outer edges + 4 hole edges, 2 triangles each.
    assert_eq!(sides, 16);
    assert!(output.mesh.validate(1.0e-9));
}

#[test]
fn unknown_layer_is_skipped_with_warning() {
    let unknown = LayerId::new(9, 0);
    let mut geometry = LayerGeometry::new();
    geometry.push_ring(MET1, square(0.0, 2.0));
    geometry.push_ring(unknown, square(0.0, 5.0));

    let output = render_to_mesh(
        &geometry,
        &single_layer_stack(0.0, 1.0),
        &PipelineConfig::default(),
    )
    .unwrap();

    // The known layer still renders fully.
    assert_eq!(output.mesh.triangle_count(), 12);
    assert_eq!(
        output.warnings,
        vec![RenderWarning::MissingStackEntry { layer: unknown }]
    );
}

#[test]
fn non_positive_thickness_aborts_before_geometry() {
    let mut geometry = LayerGeometry::new();
    geometry.push_ring(MET1, square(0.0, 2.0));

    let err = render_to_mesh(
        &geometry,
        &single_layer_stack(0.0, 0.0),
        &PipelineConfig::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("thickness"));
}

#[test]
fn layers_stack_in_z_and_palette_order() {
    let met2 = LayerId::new(4, 0);
    let mut geometry = LayerGeometry::new();
    geometry.push_ring(MET1, square(0.0, 2.0));
    geometry.push_ring(met2, square(0.0, 2.0));

    let mut stack = LayerStack::new();
    stack.insert(MET1, entry("met1", 0.0, 1.0));
    stack.insert(
        met2,
        LayerStackEntry {
            material: Material::new("aluminum", [200, 200, 210, 255]),
            ..entry("met2", 2.0, 1.0)
        },
    );

    let output = render_to_mesh(&geometry, &stack, &PipelineConfig::default()).unwrap();

    assert_eq!(output.palette.len(), 2);
    assert_eq!(output.palette[0].name, "copper");
    assert_eq!(output.palette[1].name, "aluminum");

    let (min, max) = output.mesh.bounding_box();
    assert!((min.z - 0.0).abs() < 1e-12);
    assert!((max.z - 3.0).abs() < 1e-12);

    // Both material tags appear.
    assert!(output.mesh.materials().contains(&0));
    assert!(output.mesh.materials().contains(&1));
}

#[test]
fn degenerate_ring_warns_and_continues() {
    let mut geometry = LayerGeometry::new();
    geometry.push_ring(MET1, square(0.0, 2.0));
    geometry.push_ring(MET1, vec![DVec2::ZERO, DVec2::new(1.0, 0.0)]);

    let output = render_to_mesh(
        &geometry,
        &single_layer_stack(0.0, 1.0),
        &PipelineConfig::default(),
    )
    .unwrap();

    assert_eq!(output.mesh.triangle_count(), 12);
    assert!(matches!(
        output.warnings.as_slice(),
        [RenderWarning::DegenerateRing { layer, points: 2 }] if *layer == MET1
    ));
}

#[test]
fn self_intersecting_polygon_warns_and_rest_renders() {
    // A bowtie ring (crossing edges, nonzero shoelace area) survives
    // normalization but fails triangulation; the valid square on the same
    // layer must still extrude.
    let mut geometry = LayerGeometry::new();
    geometry.push_ring(
        MET1,
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(5.0, 0.0),
            DVec2::new(0.0, 2.0),
            DVec2::new(3.0, 4.0),
        ],
    );
    geometry.push_ring(MET1, square(10.0, 12.0));

    let output = render_to_mesh(
        &geometry,
        &single_layer_stack(0.0, 1.0),
        &PipelineConfig::default(),
    )
    .unwrap();

    assert_eq!(output.mesh.triangle_count(), 12);
    assert!(matches!(
        output.warnings.as_slice(),
        [RenderWarning::Triangulation { layer, .. }] if *layer == MET1
    ));
}

#[test]
fn all_degenerate_layer_reports_empty() {
    let mut geometry = LayerGeometry::new();
    geometry.push_ring(MET1, vec![DVec2::ZERO, DVec2::new(1.0, 0.0)]);

    let output = render_to_mesh(
        &geometry,
        &single_layer_stack(0.0, 1.0),
        &PipelineConfig::default(),
    )
    .unwrap();

    assert!(output.mesh.is_empty());
    assert_eq!(
        output.warnings,
        vec![
            RenderWarning::DegenerateRing {
                layer: MET1,
                points: 2,
            },
            RenderWarning::EmptyLayer { layer: MET1 },
        ]
    );
}

#[test]
fn parallel_and_sequential_agree() {
    let mut geometry = LayerGeometry::new();
    let mut stack = LayerStack::new();
    for i in 0..6u16 {
        let id = LayerId::new(10 + i, 0);
        let offset = i as f64 * 0.4;
        geometry.push_ring(
            id,
            vec![
                DVec2::new(offset, 0.0),
                DVec2::new(offset + 3.0, 0.0),
                DVec2::new(offset + 3.0, 2.0),
                DVec2::new(offset, 2.0),
            ],
        );
        geometry.push_ring(id, square(1.0, 1.5));
        stack.insert(id, entry(&format!("layer{i}"), i as f64, 0.8));
    }

    let parallel = render_to_mesh(&geometry, &stack, &PipelineConfig::default()).unwrap();
    let sequential =
        render_to_mesh(&geometry, &stack, &PipelineConfig::default().sequential()).unwrap();

    assert_eq!(parallel.mesh.vertices(), sequential.mesh.vertices());
    assert_eq!(parallel.mesh.triangles(), sequential.mesh.triangles());
    assert_eq!(parallel.mesh.materials(), sequential.mesh.materials());
    assert_eq!(parallel.warnings, sequential.warnings);
}

#[test]
fn rerun_is_byte_identical() {
    let mut geometry = LayerGeometry::new();
    geometry.push_ring(MET1, square(0.0, 3.0));
    geometry.push_ring(MET1, square(2.0, 5.0));
    let stack = single_layer_stack(0.5, 1.5);

    let first = render_to_mesh(&geometry, &stack, &PipelineConfig::default()).unwrap();
    let second = render_to_mesh(&geometry, &stack, &PipelineConfig::default()).unwrap();

    assert_eq!(first.mesh.vertices(), second.mesh.vertices());
    assert_eq!(first.mesh.triangles(), second.mesh.triangles());
}
