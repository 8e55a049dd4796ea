use anyhow::Context;
use glam::{Mat3, Vec3};
use gltf::buffer;
use itertools::izip;

use crate::math::bounds::AABB;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Geometry owned by a single object, in the object's local space.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

pub type Buffers<'a> = &'a [buffer::Data];

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
        }
    }

    /// All triangle primitives of a glTF mesh merged into one vertex/index list.
    pub fn from_gltf(
        name: impl Into<String>,
        mesh: gltf::Mesh,
        buffers: Buffers,
    ) -> anyhow::Result<Mesh> {
        let mut merged = Mesh::new(name, Vec::new(), Vec::new());

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                return Err(anyhow::anyhow!(
                    "Unsupported primitive mode: {:?}",
                    primitive.mode()
                ));
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let position_reader = reader
                .read_positions()
                .with_context(|| format!("Primitive without positions in {}", merged.name))?;
            let normal_reader: Box<dyn Iterator<Item = [f32; 3]>> = match reader.read_normals() {
                Some(normals) => Box::new(normals),
                None => Box::new(std::iter::repeat([0.0; 3])),
            };

            let base_vertex = merged.vertices.len() as u32;
            let vertices = izip!(position_reader, normal_reader)
                .map(|(position, normal)| Vertex::new(Vec3::from(position), Vec3::from(normal)));
            merged.vertices.extend(vertices);
            let vertex_count = merged.vertices.len() as u32 - base_vertex;

            match reader.read_indices() {
                Some(indices) => merged
                    .indices
                    .extend(indices.into_u32().map(|index| base_vertex + index)),
                None => merged
                    .indices
                    .extend((0..vertex_count).map(|index| base_vertex + index)),
            }
        }

        if merged.vertices.is_empty() {
            return Err(anyhow::anyhow!("Mesh without primitives: {}", merged.name));
        }

        Ok(merged)
    }

    pub fn bounding_box(&self) -> Option<AABB> {
        AABB::from_points(self.vertices.iter().map(|vertex| vertex.position))
    }

    /// Transforms positions by `linear`, normals by its inverse transpose.
    pub fn transform(&mut self, linear: Mat3) {
        let normal_matrix = linear.inverse().transpose();

        for vertex in &mut self.vertices {
            vertex.position = linear * vertex.position;
            vertex.normal = (normal_matrix * vertex.normal).normalize_or_zero();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn quad() -> Mesh {
        Mesh::new(
            "Quad",
            vec![
                Vertex::new(Vec3::new(0.0, 0.0, 0.0), Vec3::Z),
                Vertex::new(Vec3::new(2.0, 0.0, 0.0), Vec3::Z),
                Vertex::new(Vec3::new(2.0, 1.0, 0.0), Vec3::Z),
                Vertex::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Z),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn bounding_box_spans_vertices() {
        let aabb = quad().bounding_box().unwrap();
        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn empty_mesh_has_no_bounding_box() {
        assert!(Mesh::new("Empty", Vec::new(), Vec::new())
            .bounding_box()
            .is_none());
    }

    #[test]
    fn transform_rotates_positions_and_normals() {
        let mut mesh = quad();
        mesh.transform(Mat3::from_rotation_x(FRAC_PI_2));

        assert!(mesh.vertices[2]
            .position
            .abs_diff_eq(Vec3::new(2.0, 0.0, 1.0), 1e-6));
        assert!(mesh.vertices[0].normal.abs_diff_eq(-Vec3::Y, 1e-6));
    }
}
