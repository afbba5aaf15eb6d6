use cgmath::Vector3;

use crate::gfx::resources::material::MeshMaterial;

use super::{bounds::Aabb, vertex::Vertex3D};

/// A single indexed triangle mesh with its material.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex3D>,
    pub indices: Vec<u32>,
    pub material: MeshMaterial,
}

impl Mesh {
    /// Builds a mesh from flat `[x, y, z, ...]` position and normal arrays.
    ///
    /// Missing or mismatched normals are recomputed from the triangles.
    pub fn new(name: impl Into<String>, positions: &[f32], normals: &[f32], indices: Vec<u32>) -> Self {
        let computed;
        let normals = if !normals.is_empty() && normals.len() == positions.len() {
            normals
        } else {
            computed = Self::calculate_vertex_normals(positions, &indices);
            computed.as_slice()
        };

        let vertices = positions
            .chunks_exact(3)
            .zip(normals.chunks_exact(3))
            .map(|(p, n)| Vertex3D {
                position: [p[0], p[1], p[2]],
                normal: [n[0], n[1], n[2]],
            })
            .collect();

        Self {
            name: name.into(),
            vertices,
            indices,
            material: MeshMaterial::default(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounding box in the mesh's local space.
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| v.position))
    }

    /// Averages the face normals touching each vertex.
    pub fn calculate_vertex_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let vertex_count = positions.len() / 3;
        let mut normals = vec![0.0; vertex_count * 3];
        let position = |i: usize| {
            Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2])
        };

        for triangle in indices.chunks_exact(3) {
            let (i0, i1, i2) = (
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            );
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let face_normal = (position(i1) - position(i0)).cross(position(i2) - position(i0));

            for vertex_idx in [i0, i1, i2] {
                normals[vertex_idx * 3] += face_normal.x;
                normals[vertex_idx * 3 + 1] += face_normal.y;
                normals[vertex_idx * 3 + 2] += face_normal.z;
            }
        }

        for n in normals.chunks_exact_mut(3) {
            let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            if length > 0.0 {
                n.iter_mut().for_each(|c| *c /= length);
            }
        }

        normals
    }
}

/// A loaded model: a named group of meshes placed at `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelObject {
    pub name: String,
    pub children: Vec<Mesh>,
    pub position: Vector3<f32>,
}

impl ModelObject {
    pub fn new(name: impl Into<String>, children: Vec<Mesh>) -> Self {
        Self {
            name: name.into(),
            children,
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    /// World-space bounding box of all child meshes.
    pub fn bounding_box(&self) -> Aabb {
        self.children
            .iter()
            .fold(Aabb::empty(), |acc, mesh| acc.union(&mesh.bounding_box()))
            .translated(self.position)
    }

    pub fn vertex_count(&self) -> usize {
        self.children.iter().map(Mesh::vertex_count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.children.iter().map(Mesh::triangle_count).sum()
    }
}
