//! # Mesh Assembler
//!
//! Folds per-layer meshes into the final output mesh. Vertices are
//! deduplicated through a quantized-position index so coincident layer
//! boundaries (cap edges meeting side walls, stacked layers sharing a
//! plane) weld into a single vertex; triangles that collapse under that
//! welding are dropped.
//!
//! The fold is strictly sequential in the order parts are pushed, which
//! the pipeline drives in ascending layer-identifier order. Output is
//! therefore identical for identical input regardless of how the per-layer
//! work was scheduled.

use std::collections::HashMap;

use glam::DVec3;

use crate::mesh::Mesh;

/// Incremental mesh builder with vertex welding.
#[derive(Debug)]
pub struct MeshAssembler {
    mesh: Mesh,
    index: HashMap<(i64, i64, i64), u32>,
    epsilon: f64,
}

impl MeshAssembler {
    /// Creates an assembler welding vertices within `epsilon` of each
    /// other (same quantization cell).
    pub fn new(epsilon: f64) -> Self {
        Self {
            mesh: Mesh::new(),
            index: HashMap::new(),
            epsilon,
        }
    }

    fn vertex_key(&self, position: DVec3) -> (i64, i64, i64) {
        (
            (position.x / self.epsilon).round() as i64,
            (position.y / self.epsilon).round() as i64,
            (position.z / self.epsilon).round() as i64,
        )
    }

    fn dedup_vertex(&mut self, position: DVec3) -> u32 {
        let key = self.vertex_key(position);
        if let Some(&existing) = self.index.get(&key) {
            return existing;
        }
        let index = self.mesh.add_vertex(position);
        self.index.insert(key, index);
        index
    }

    /// Appends a part mesh, welding its vertices into the accumulated
    /// output. Triangles whose corners weld together are dropped.
    pub fn push(&mut self, part: &Mesh) {
        for (tri, &material) in part.triangles().iter().zip(part.materials()) {
            let v0 = self.dedup_vertex(part.vertex(tri[0]));
            let v1 = self.dedup_vertex(part.vertex(tri[1]));
            let v2 = self.dedup_vertex(part.vertex(tri[2]));

            if v0 == v1 || v1 == v2 || v0 == v2 {
                continue;
            }
            self.mesh.add_triangle(v0, v1, v2, material);
        }
    }

    /// Consumes the assembler and returns the welded mesh.
    pub fn finish(self) -> Mesh {
        self.mesh
    }
}
