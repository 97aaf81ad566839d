//! # Mesh Data Structure
//!
//! Core mesh representation with vertices, indexed triangles, and
//! per-triangle material tags.

use glam::DVec3;

/// An indexed triangle mesh with per-triangle material tags.
///
/// All geometry uses f64 internally; f32 export only happens at the
/// exporter boundary. The `materials` sequence runs parallel to
/// `triangles`: `materials[i]` is the palette slot of triangle `i`.
///
/// # Example
///
/// ```rust
/// use layout_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2, 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions (f64 for precision).
    vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle).
    triangles: Vec<[u32; 3]>,
    /// Material palette slot per triangle.
    materials: Vec<u32>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            materials: Vec::with_capacity(triangle_count),
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices with its material tag.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32, material: u32) {
        self.triangles.push([v0, v1, v2]);
        self.materials.push(material);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the per-triangle material tags.
    #[inline]
    pub fn materials(&self) -> &[u32] {
        &self.materials
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the triangle at the given index.
    #[inline]
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.vertices.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for v in &self.vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        (min, max)
    }

    /// Appends another mesh, offsetting its indices.
    ///
    /// Performs no vertex deduplication; the assembler handles that.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&other.vertices);

        for tri in &other.triangles {
            self.triangles
                .push([tri[0] + offset, tri[1] + offset, tri[2] + offset]);
        }
        self.materials.extend_from_slice(&other.materials);
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - One material tag per triangle
    /// - All triangle indices are valid
    /// - All triangle indices are distinct
    /// - No triangle has an area below `area_epsilon`
    ///
    /// Returns true if valid.
    pub fn validate(&self, area_epsilon: f64) -> bool {
        if self.materials.len() != self.triangles.len() {
            return false;
        }

        let vertex_count = self.vertices.len() as u32;

        for tri in &self.triangles {
            if tri[0] >= vertex_count || tri[1] >= vertex_count || tri[2] >= vertex_count {
                return false;
            }

            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }

            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];
            let doubled_area = (v1 - v0).cross(v2 - v0).length();
            if doubled_area / 2.0 < area_epsilon {
                return false;
            }
        }

        true
    }

    /// Exports vertices as f32 array for the exporter collaborator.
    ///
    /// Returns flattened `[x, y, z, x, y, z, ...]`.
    pub fn vertices_f32(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.vertices.len() * 3);
        for v in &self.vertices {
            result.push(v.x as f32);
            result.push(v.y as f32);
            result.push(v.z as f32);
        }
        result
    }

    /// Exports triangle indices as a flat u32 array.
    ///
    /// Returns flattened `[i0, i1, i2, i0, i1, i2, ...]`.
    pub fn indices_u32(&self) -> Vec<u32> {
        let mut result = Vec::with_capacity(self.triangles.len() * 3);
        for tri in &self.triangles {
            result.push(tri[0]);
            result.push(tri[1]);
            result.push(tri[2]);
        }
        result
    }
}
