//! Live preview of a collection transform.
//!
//! ```text
//!            enable                 parameter change
//!   Idle ───────────────► Previewing ───────────────► Previewing + snapshot
//!    ▲                        │                             │    ▲
//!    │        commit/cancel   │                             └────┘
//!    └────────────────────────┴─────────────────────────────┘
//!                                       restore, reapply
//! ```
//!
//! The first parameter change captures the pose of every member; every later
//! change restores that pose before applying the new delta, so repeated
//! edits never compound.

use glam::Mat4;
use std::collections::HashMap;

use crate::scene_graph::{CollectionId, ObjectId, Scene, Transform};

/// Poses of every collection member from just before the preview moved them.
#[derive(Debug, Clone)]
pub struct PreviewSnapshot {
    collection_id: CollectionId,
    poses: HashMap<ObjectId, Transform>,
}

impl PreviewSnapshot {
    pub fn capture(scene: &Scene, collection_id: CollectionId) -> Self {
        scene.update_transforms();

        let poses = scene
            .collection_members(collection_id)
            .into_iter()
            .filter_map(|id| {
                let transform = scene.get_object_transform(id)?;
                Some((id, transform.clone()))
            })
            .collect();

        Self {
            collection_id,
            poses,
        }
    }

    pub fn collection_id(&self) -> CollectionId {
        self.collection_id
    }

    pub fn world_matrix(&self, id: ObjectId) -> Option<Mat4> {
        self.poses
            .get(&id)
            .map(|transform| *transform.get_world_matrix())
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Puts every captured object back exactly as it was.
    pub fn restore(&self, scene: &mut Scene) {
        for (&id, transform) in &self.poses {
            scene.restore_object_transform(id, transform.clone());
        }

        scene.update_transforms();
    }

    pub fn into_poses(self) -> HashMap<ObjectId, Transform> {
        self.poses
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPhase {
    Idle,
    Previewing,
}

#[derive(Debug, Default)]
enum PreviewState {
    #[default]
    Idle,
    Previewing {
        snapshot: Option<PreviewSnapshot>,
    },
}

#[derive(Debug, Default)]
pub struct PreviewSession {
    state: PreviewState,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PreviewPhase {
        match self.state {
            PreviewState::Idle => PreviewPhase::Idle,
            PreviewState::Previewing { .. } => PreviewPhase::Previewing,
        }
    }

    pub fn is_previewing(&self) -> bool {
        self.phase() == PreviewPhase::Previewing
    }

    pub fn snapshot(&self) -> Option<&PreviewSnapshot> {
        match &self.state {
            PreviewState::Previewing { snapshot } => snapshot.as_ref(),
            PreviewState::Idle => None,
        }
    }

    /// Idle → Previewing. Enabling an active session keeps its snapshot.
    pub fn enable(&mut self) {
        if let PreviewState::Idle = self.state {
            log::debug!("Preview enabled");
            self.state = PreviewState::Previewing { snapshot: None };
        }
    }

    /// Gets the scene ready for the next preview application and returns
    /// the collection it applies to.
    ///
    /// The first call of a session snapshots `collection_id` and binds the
    /// session to it; later calls restore that snapshot and keep the bound
    /// collection. Returns `None` when not previewing.
    pub fn restore_or_capture(
        &mut self,
        scene: &mut Scene,
        collection_id: CollectionId,
    ) -> Option<CollectionId> {
        let PreviewState::Previewing { snapshot } = &mut self.state else {
            return None;
        };

        match snapshot {
            Some(snapshot) => {
                snapshot.restore(scene);
                Some(snapshot.collection_id())
            }
            None => {
                let captured = PreviewSnapshot::capture(scene, collection_id);
                log::debug!("Preview snapshot of {} object(s)", captured.len());
                *snapshot = Some(captured);
                Some(collection_id)
            }
        }
    }

    /// Previewing → Idle keeping the scene as it is. The snapshot is handed
    /// back so the caller can record the pre-preview state for undo.
    pub fn commit(&mut self) -> Option<PreviewSnapshot> {
        match std::mem::take(&mut self.state) {
            PreviewState::Previewing { snapshot } => {
                log::debug!("Preview committing");
                snapshot
            }
            PreviewState::Idle => None,
        }
    }

    /// Previewing → Idle restoring every captured object. Returns whether a
    /// session was active.
    pub fn cancel(&mut self, scene: &mut Scene) -> bool {
        match std::mem::take(&mut self.state) {
            PreviewState::Previewing { snapshot } => {
                if let Some(snapshot) = snapshot {
                    snapshot.restore(scene);
                }
                log::debug!("Preview cancelled");
                true
            }
            PreviewState::Idle => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::{Collection, Object3D};
    use glam::{Quat, Vec3};

    fn scene_with_collection() -> (Scene, CollectionId, ObjectId) {
        let mut scene = Scene::new();
        let id = scene.add_object(Object3D::new("A").with_translation(Vec3::new(1.0, 2.0, 3.0)));
        let collection = scene.add_collection(Collection::new("C"));
        scene.link_object(collection, id);
        (scene, collection, id)
    }

    #[test]
    fn idle_session_neither_captures_nor_restores() {
        let (mut scene, collection, _) = scene_with_collection();
        let mut session = PreviewSession::new();

        assert_eq!(session.phase(), PreviewPhase::Idle);
        assert_eq!(session.restore_or_capture(&mut scene, collection), None);
        assert!(!session.cancel(&mut scene));
        assert!(session.commit().is_none());
    }

    #[test]
    fn first_change_captures_later_changes_restore() {
        let (mut scene, collection, id) = scene_with_collection();
        let before = scene.world_matrix(id).unwrap();
        let mut session = PreviewSession::new();

        session.enable();
        assert!(session.is_previewing());
        assert!(session.snapshot().is_none());

        assert_eq!(session.restore_or_capture(&mut scene, collection), Some(collection));
        assert_eq!(session.snapshot().unwrap().world_matrix(id), Some(before));

        scene.set_object_transform(id, Vec3::ZERO, Quat::from_rotation_y(1.0), Vec3::ONE);
        session.restore_or_capture(&mut scene, collection);
        assert_eq!(scene.world_matrix(id).unwrap(), before);
    }

    #[test]
    fn session_stays_bound_to_first_collection() {
        let (mut scene, collection, _) = scene_with_collection();
        let other = scene.add_collection(Collection::new("Other"));
        let mut session = PreviewSession::new();

        session.enable();
        session.restore_or_capture(&mut scene, collection);
        assert_eq!(session.restore_or_capture(&mut scene, other), Some(collection));
    }

    #[test]
    fn cancel_restores_and_returns_to_idle() {
        let (mut scene, collection, id) = scene_with_collection();
        let before = scene.world_matrix(id).unwrap();
        let mut session = PreviewSession::new();

        session.enable();
        session.restore_or_capture(&mut scene, collection);
        scene.set_object_transform(id, Vec3::splat(9.0), Quat::IDENTITY, Vec3::ONE);

        assert!(session.cancel(&mut scene));
        assert_eq!(session.phase(), PreviewPhase::Idle);
        assert_eq!(scene.world_matrix(id).unwrap(), before);
    }

    #[test]
    fn commit_hands_back_snapshot_and_keeps_scene() {
        let (mut scene, collection, id) = scene_with_collection();
        let mut session = PreviewSession::new();

        session.enable();
        session.restore_or_capture(&mut scene, collection);
        scene.set_object_transform(id, Vec3::splat(9.0), Quat::IDENTITY, Vec3::ONE);

        let snapshot = session.commit().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(session.phase(), PreviewPhase::Idle);
        assert!(scene
            .world_origin(id)
            .unwrap()
            .abs_diff_eq(Vec3::splat(9.0), 1e-6));
    }
}
