use std::collections::HashMap;

use crate::scene_graph::{Mesh, ObjectId, Scene, Transform};

/// Everything needed to put a set of objects back the way they were before
/// one user-visible operation.
#[derive(Debug, Clone)]
pub struct UndoStep {
    label: String,
    poses: HashMap<ObjectId, Transform>,
    geometry: HashMap<ObjectId, Option<Mesh>>,
}

impl UndoStep {
    /// Records the current local transforms of `object_ids`, and their meshes
    /// when the operation is going to rewrite geometry.
    pub fn capture(
        label: impl Into<String>,
        scene: &Scene,
        object_ids: impl IntoIterator<Item = ObjectId>,
        include_geometry: bool,
    ) -> Self {
        let mut poses = HashMap::new();
        let mut geometry = HashMap::new();

        for id in object_ids {
            let Some(object) = scene.get_object(id) else {
                continue;
            };

            poses.insert(id, object.transform.clone());
            if include_geometry {
                geometry.insert(id, object.mesh.clone());
            }
        }

        Self {
            label: label.into(),
            poses,
            geometry,
        }
    }

    /// Replaces recorded poses, e.g. with the state from before a preview.
    pub fn override_poses(&mut self, poses: impl IntoIterator<Item = (ObjectId, Transform)>) {
        self.poses.extend(poses);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn revert(self, scene: &mut Scene) {
        for (id, transform) in self.poses {
            scene.restore_object_transform(id, transform);
        }

        for (id, mesh) in self.geometry {
            if let Some(object) = scene.get_object_mut(id) {
                object.mesh = mesh;
            }
        }

        scene.update_transforms();
    }
}

/// The host's undo stack, seen from this crate.
pub trait UndoLog {
    fn push_step(&mut self, step: UndoStep);
}

/// Whether a scene mutation is visible to the host's undo stack.
pub enum Recording<'a> {
    /// Logged as a single step under `label`.
    Undoable {
        log: &'a mut dyn UndoLog,
        label: &'a str,
    },
    /// Preview mutations; nothing reaches the undo log.
    Transparent,
}

/// A linear undo stack.
#[derive(Debug, Default)]
pub struct History {
    steps: Vec<UndoStep>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_label(&self) -> Option<&str> {
        self.steps.last().map(UndoStep::label)
    }

    /// Reverts the most recent step, returning its label.
    pub fn undo(&mut self, scene: &mut Scene) -> Option<String> {
        let step = self.steps.pop()?;
        let label = step.label.clone();
        step.revert(scene);

        log::debug!("Undid {}", label);
        Some(label)
    }
}

impl UndoLog for History {
    fn push_step(&mut self, step: UndoStep) {
        log::debug!("Recorded undo step {} ({} objects)", step.label, step.len());
        self.steps.push(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::{Object3D, Vertex};
    use glam::{Quat, Vec3};

    #[test]
    fn undo_restores_transforms_and_geometry() {
        let mut scene = Scene::new();
        let mesh = Mesh::new("Tri", vec![Vertex::new(Vec3::X, Vec3::Z)], vec![0]);
        let id = scene.add_object(
            Object3D::new("A")
                .with_translation(Vec3::new(1.0, 2.0, 3.0))
                .with_mesh(mesh.clone()),
        );
        let before = scene.world_matrix(id).unwrap();

        let mut history = History::new();
        history.push_step(UndoStep::capture("Edit", &scene, [id], true));

        scene.set_object_transform(id, Vec3::ZERO, Quat::from_rotation_x(1.0), Vec3::ONE);
        scene.get_object_mut(id).unwrap().mesh = None;

        assert_eq!(history.last_label(), Some("Edit"));
        assert_eq!(history.undo(&mut scene).as_deref(), Some("Edit"));
        assert!(history.is_empty());
        assert_eq!(scene.world_matrix(id).unwrap(), before);
        assert_eq!(scene.get_object(id).unwrap().mesh.as_ref(), Some(&mesh));
    }

    #[test]
    fn geometry_is_left_alone_unless_captured() {
        let mut scene = Scene::new();
        let id = scene.add_object(Object3D::new("A"));
        let step = UndoStep::capture("Move", &scene, [id], false);

        let mesh = Mesh::new("New", Vec::new(), Vec::new());
        scene.get_object_mut(id).unwrap().mesh = Some(mesh.clone());
        step.revert(&mut scene);

        assert_eq!(scene.get_object(id).unwrap().mesh, Some(mesh));
    }
}
