use glam::Vec3;
use id_arena::Id;

use crate::scene_graph::mesh::Mesh;
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

/// A node of the scene hierarchy. Geometry is owned, never shared.
#[derive(Debug)]
pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
}

impl Object3D {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.transform.set_translation(translation);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Transform::from_translation(Vec3::ZERO),
            mesh: None,
            parent_id: None,
            child_ids: Vec::new(),
        }
    }
}
