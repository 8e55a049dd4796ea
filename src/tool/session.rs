//! The tool as the host sees it: property values, the apply button, and the
//! preview toggle with its commit/cancel actions.

use glam::Vec3;
use std::fmt;

use crate::scene_graph::Scene;
use crate::tool::apply::{affected_objects, apply_transform, bake_rotations};
use crate::tool::config::ToolConfig;
use crate::tool::delta::{clamp_scale, degrees_to_radians, TransformDelta};
use crate::tool::error::{TransformError, TransformResult};
use crate::tool::host::HostContext;
use crate::tool::pivot::{resolve_pivot, PivotMode};
use crate::tool::preview::{PreviewPhase, PreviewSession};
use crate::tool::roots::CollectionTarget;
use crate::tool::undo::{Recording, UndoLog, UndoStep};

pub const PREVIEW_STATUS: &str = "Previewing — not committed";
pub const READY_STATUS: &str = "Ready";
pub const APPLY_LABEL: &str = "Apply Transform";
pub const COMMIT_LABEL: &str = "Commit Transform";

/// What one transform touched.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyReport {
    pub collection: String,
    pub root_count: usize,
    pub member_count: usize,
    pub pivot_mode: PivotMode,
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transformed '{}' ({} root object(s), {} total), pivot: {}",
            self.collection, self.root_count, self.member_count, self.pivot_mode
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// Committed to the scene and recorded as one undo step.
    Applied(ApplyReport),
    /// Applied as a preview; not undoable, not yet committed.
    Previewed(ApplyReport),
    /// The collection has no objects to move.
    EmptyCollection { collection: String },
    /// Every value sits at its default, or a preview had nothing to commit.
    NothingToApply,
}

/// Session-scoped tool state: the dialled-in delta, the flags, and the
/// preview session. Reset to identity after every commit.
#[derive(Debug, Default)]
pub struct SessionContext {
    pub config: ToolConfig,
    delta: TransformDelta,
    bake_rotation: bool,
    preview: PreviewSession,
    last_report: Option<ApplyReport>,
}

impl SessionContext {
    pub fn new(config: ToolConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn delta(&self) -> &TransformDelta {
        &self.delta
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.delta.translation = translation;
    }

    /// Rotation as shown in the UI, in degrees.
    pub fn set_rotation_degrees(&mut self, rotation_degrees: Vec3) {
        self.delta.rotation = degrees_to_radians(rotation_degrees);
    }

    /// Clamped to the configured floor.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.delta.scale = clamp_scale(scale, self.config.scale_floor);
    }

    pub fn set_delta(&mut self, delta: TransformDelta) {
        self.delta = TransformDelta {
            scale: clamp_scale(delta.scale, self.config.scale_floor),
            ..delta
        };
    }

    pub fn bake_rotation(&self) -> bool {
        self.bake_rotation
    }

    pub fn set_bake_rotation(&mut self, bake_rotation: bool) {
        self.bake_rotation = bake_rotation;
    }

    pub fn preview_phase(&self) -> PreviewPhase {
        self.preview.phase()
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_previewing()
    }

    pub fn status_text(&self) -> &'static str {
        if self.is_previewing() {
            PREVIEW_STATUS
        } else {
            READY_STATUS
        }
    }

    pub fn action_label(&self) -> &'static str {
        if self.is_previewing() {
            COMMIT_LABEL
        } else {
            APPLY_LABEL
        }
    }

    /// The preview toggle. Turning it off cancels the running session.
    pub fn set_preview_enabled(&mut self, enabled: bool, scene: &mut Scene) {
        if enabled {
            self.preview.enable();
        } else {
            self.cancel(scene);
        }
    }

    fn resolve_selection(
        &self,
        scene: &Scene,
        host: &dyn HostContext,
    ) -> TransformResult<CollectionTarget> {
        let collection_id = host
            .selected_collection()
            .ok_or(TransformError::NoSelection)?;
        CollectionTarget::resolve(scene, collection_id)
    }

    fn report(&self, target: &CollectionTarget, pivot_mode: PivotMode) -> ApplyReport {
        ApplyReport {
            collection: target.name.clone(),
            root_count: target.roots.len(),
            member_count: target.members.len(),
            pivot_mode,
        }
    }

    /// The apply button. Transforms the selected collection and records one
    /// undo step; while previewing it commits the preview instead.
    pub fn apply(
        &mut self,
        scene: &mut Scene,
        host: &dyn HostContext,
        undo_log: &mut dyn UndoLog,
    ) -> TransformResult<ApplyOutcome> {
        if self.is_previewing() {
            return self.commit(scene, undo_log);
        }

        let target = self.resolve_selection(scene, host)?;
        let Some(resolved) = resolve_pivot(scene, &target.roots, host, self.config.fallback_pivot)
        else {
            log::warn!("Collection '{}' contains no objects", target.name);
            return Ok(ApplyOutcome::EmptyCollection {
                collection: target.name,
            });
        };

        if self.delta.is_identity() {
            log::info!("Nothing to apply (all values at default)");
            return Ok(ApplyOutcome::NothingToApply);
        }

        apply_transform(
            scene,
            &target,
            &self.delta,
            &resolved.pivot,
            self.bake_rotation,
            Recording::Undoable {
                log: undo_log,
                label: APPLY_LABEL,
            },
        );

        self.delta.reset();

        let report = self.report(&target, resolved.mode);
        log::info!("{}", report);
        Ok(ApplyOutcome::Applied(report))
    }

    /// Runs after every parameter change while previewing. Restores the
    /// pre-preview state, or captures it on the first change, then applies
    /// the current delta without touching the undo log. Rotation is never
    /// baked during a preview, only on commit.
    pub fn preview_step(
        &mut self,
        scene: &mut Scene,
        host: &dyn HostContext,
    ) -> TransformResult<ApplyOutcome> {
        if !self.is_previewing() {
            return Ok(ApplyOutcome::NothingToApply);
        }

        let collection_id = match self.preview.snapshot() {
            Some(snapshot) => snapshot.collection_id(),
            None => host
                .selected_collection()
                .ok_or(TransformError::NoSelection)?,
        };
        let target = CollectionTarget::resolve(scene, collection_id)?;

        self.preview.restore_or_capture(scene, collection_id);

        let Some(resolved) = resolve_pivot(scene, &target.roots, host, self.config.fallback_pivot)
        else {
            return Ok(ApplyOutcome::EmptyCollection {
                collection: target.name,
            });
        };

        if !self.delta.is_identity() {
            apply_transform(
                scene,
                &target,
                &self.delta,
                &resolved.pivot,
                false,
                Recording::Transparent,
            );
        }

        let report = self.report(&target, resolved.mode);
        log::debug!("Preview: {}", report);
        self.last_report = Some(report.clone());
        Ok(ApplyOutcome::Previewed(report))
    }

    /// Makes the previewed state permanent as a single undo step whose
    /// "before" is the pre-preview state, bakes rotations if requested, and
    /// ends the session.
    pub fn commit(
        &mut self,
        scene: &mut Scene,
        undo_log: &mut dyn UndoLog,
    ) -> TransformResult<ApplyOutcome> {
        let snapshot = self.preview.commit();
        let report = self.last_report.take();
        self.delta.reset();

        let (Some(snapshot), Some(report)) = (snapshot, report) else {
            log::info!("Nothing to commit");
            return Ok(ApplyOutcome::NothingToApply);
        };

        let target = CollectionTarget::resolve(scene, snapshot.collection_id())?;
        let mut step = UndoStep::capture(
            COMMIT_LABEL,
            scene,
            affected_objects(scene, &target.members),
            self.bake_rotation,
        );
        step.override_poses(snapshot.into_poses());

        if self.bake_rotation {
            let baked = bake_rotations(scene, &target.members);
            log::debug!("Baked rotation of {} object(s) in {}", baked, target.name);
        }

        undo_log.push_step(step);

        log::info!("{}", report);
        Ok(ApplyOutcome::Applied(report))
    }

    /// Restores everything the preview moved and ends the session without
    /// an undo step. Returns whether a session was active.
    pub fn cancel(&mut self, scene: &mut Scene) -> bool {
        self.delta.reset();
        self.last_report = None;
        self.preview.cancel(scene)
    }
}
