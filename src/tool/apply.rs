use glam::{Mat3, Mat4, Quat, Vec3};
use std::collections::HashSet;

use crate::scene_graph::{ObjectId, Scene};
use crate::tool::compose::{pivoted_matrix, rotation_scale_matrix};
use crate::tool::delta::TransformDelta;
use crate::tool::pivot::Pivot;
use crate::tool::roots::CollectionTarget;
use crate::tool::undo::{Recording, UndoStep};

const RESIDUAL_EPSILON: f32 = 1e-6;

/// The matrix to left-multiply onto each root's world matrix.
#[derive(Debug, Clone, Default)]
pub struct TransformPlan {
    pub matrices: Vec<(ObjectId, Mat4)>,
}

impl TransformPlan {
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}

/// Composes one matrix per root. Individual origins are read before
/// anything moves, so root order never matters.
pub fn plan_transform(
    scene: &Scene,
    roots: &[ObjectId],
    delta: &TransformDelta,
    pivot: &Pivot,
) -> TransformPlan {
    let rotation_scale = rotation_scale_matrix(delta.rotation, delta.scale);

    let matrices = match *pivot {
        Pivot::Point(point) => {
            let matrix = pivoted_matrix(delta.translation, rotation_scale, point);
            roots.iter().map(|&id| (id, matrix)).collect()
        }
        Pivot::IndividualOrigins => roots
            .iter()
            .filter_map(|&id| {
                let origin = scene.world_origin(id)?;
                Some((id, pivoted_matrix(delta.translation, rotation_scale, origin)))
            })
            .collect(),
    };

    TransformPlan { matrices }
}

/// `world = matrix · world` for every planned root, in world space. All
/// previous world matrices are read before the first write, and shallower
/// roots are written first so a deeper root is not moved twice.
///
/// Locals are stored as translation, rotation and scale, so the result only
/// holds up to shear: a non-uniform scale across a rotated root lands on the
/// closest shear-free matrix.
pub fn apply_plan(scene: &mut Scene, plan: &TransformPlan) {
    let mut targets: Vec<(ObjectId, Mat4)> = plan
        .matrices
        .iter()
        .filter_map(|&(id, matrix)| {
            let previous = scene.world_matrix(id)?;
            Some((id, matrix * previous))
        })
        .collect();
    targets.sort_by_key(|&(id, _)| (scene.object_depth(id), id));

    for (id, world_matrix) in targets {
        scene.set_object_world_matrix(id, world_matrix);
    }

    scene.update_transforms();
}

/// Folds each member's local rotation into its geometry and resets the
/// rotation to identity. World-space vertex positions do not move; children
/// are compensated so they and their descendants stay in place too.
///
/// Parents are baked before their children. Returns the number of objects
/// whose rotation was baked.
pub fn bake_rotations(scene: &mut Scene, members: &HashSet<ObjectId>) -> usize {
    let mut ordered: Vec<ObjectId> = members.iter().copied().collect();
    ordered.sort_by_key(|&id| (scene.object_depth(id), id));

    let mut baked = 0;
    for id in ordered {
        if bake_object_rotation(scene, id) {
            baked += 1;
        }
    }

    scene.update_transforms();
    baked
}

fn bake_object_rotation(scene: &mut Scene, id: ObjectId) -> bool {
    let Some(object) = scene.get_object(id) else {
        return false;
    };

    let rotation = object.transform.rotation();
    let scale = object.transform.scale();
    if rotation == Quat::IDENTITY {
        return false;
    }
    if scale.cmpeq(Vec3::ZERO).any() {
        log::warn!("Skipping rotation bake of {}: degenerate scale", object.name);
        return false;
    }

    // Local = T·R·S becomes T·S, so geometry and children absorb S⁻¹·R·S
    let linear = Mat3::from_diagonal(scale.recip())
        * Mat3::from_quat(rotation)
        * Mat3::from_diagonal(scale);
    let child_ids = object.child_ids.clone();

    if let Some(object) = scene.get_object_mut(id) {
        if let Some(mesh) = object.mesh.as_mut() {
            mesh.transform(linear);
        }
        object.transform.set_rotation(Quat::IDENTITY);
    }

    compensate_children(scene, &child_ids, linear);

    scene.invalidate_object_hierarchy(id);
    true
}

/// Left-multiplies `linear` onto the local matrix of each child. Whatever the
/// child's TRS cannot hold (shear under a non-uniformly scaled parent) is
/// folded into its mesh and passed on to its own children, so no world-space
/// vertex moves.
fn compensate_children(scene: &mut Scene, child_ids: &[ObjectId], linear: Mat3) {
    for &child_id in child_ids {
        let Some(child) = scene.get_object_mut(child_id) else {
            continue;
        };

        let target = Mat4::from_mat3(linear) * *child.transform.get_local_matrix();
        child.transform.set_local_matrix(target);

        let stored = *child.transform.get_local_matrix();
        let residual = Mat3::from_mat4(stored.inverse() * target);
        if residual.abs_diff_eq(Mat3::IDENTITY, RESIDUAL_EPSILON) {
            continue;
        }

        if let Some(mesh) = child.mesh.as_mut() {
            mesh.transform(residual);
        }
        let grandchild_ids = child.child_ids.clone();
        compensate_children(scene, &grandchild_ids, residual);
    }
}

/// Members plus every descendant, i.e. every object whose stored state a
/// transform or bake of `members` may rewrite.
pub fn affected_objects(scene: &Scene, members: &HashSet<ObjectId>) -> HashSet<ObjectId> {
    let mut affected = HashSet::new();
    let mut stack: Vec<ObjectId> = members.iter().copied().collect();

    while let Some(id) = stack.pop() {
        if !affected.insert(id) {
            continue;
        }
        if let Some(object) = scene.get_object(id) {
            stack.extend(object.child_ids.iter().copied());
        }
    }

    affected
}

/// Transforms the roots of `target` and optionally bakes rotations of all
/// members. With [`Recording::Undoable`] the prior state is logged as one
/// step; [`Recording::Transparent`] leaves the undo log untouched.
pub fn apply_transform(
    scene: &mut Scene,
    target: &CollectionTarget,
    delta: &TransformDelta,
    pivot: &Pivot,
    bake_rotation: bool,
    recording: Recording<'_>,
) {
    let undo_step = match &recording {
        Recording::Undoable { label, .. } => Some(UndoStep::capture(
            *label,
            scene,
            affected_objects(scene, &target.members),
            bake_rotation,
        )),
        Recording::Transparent => None,
    };

    let plan = plan_transform(scene, &target.roots, delta, pivot);
    apply_plan(scene, &plan);

    if bake_rotation {
        let baked = bake_rotations(scene, &target.members);
        log::debug!("Baked rotation of {} object(s) in {}", baked, target.name);
    }

    if let (Recording::Undoable { log: undo_log, .. }, Some(step)) = (recording, undo_step) {
        undo_log.push_step(step);
    }
}
