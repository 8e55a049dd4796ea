use glam::Vec3;
use std::fmt;
use std::str::FromStr;

use crate::math::bounds::AABB;
use crate::scene_graph::{ObjectId, Scene};
use crate::tool::error::TransformError;
use crate::tool::host::HostContext;

/// Where rotation and scale are centred. Mirrors the viewport's pivot
/// selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PivotMode {
    /// Mean of the root origins.
    #[default]
    CollectionCenter,
    /// Centre of the world-space box around the roots' geometry.
    BoundingBoxCenter,
    Cursor3D,
    /// Every root turns and scales about its own origin.
    IndividualOrigins,
    /// Origin of the active object.
    ActiveElement,
}

impl PivotMode {
    pub const ALL: [PivotMode; 5] = [
        PivotMode::CollectionCenter,
        PivotMode::BoundingBoxCenter,
        PivotMode::Cursor3D,
        PivotMode::IndividualOrigins,
        PivotMode::ActiveElement,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PivotMode::CollectionCenter => "MEDIAN_POINT",
            PivotMode::BoundingBoxCenter => "BOUNDING_BOX_CENTER",
            PivotMode::Cursor3D => "CURSOR",
            PivotMode::IndividualOrigins => "INDIVIDUAL_ORIGINS",
            PivotMode::ActiveElement => "ACTIVE_ELEMENT",
        }
    }
}

impl fmt::Display for PivotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PivotMode {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");

        match normalized.as_str() {
            "median" | "median-point" | "collection-center" | "center" => {
                Ok(PivotMode::CollectionCenter)
            }
            "bounding-box" | "bounding-box-center" | "bbox" => Ok(PivotMode::BoundingBoxCenter),
            "cursor" | "cursor-3d" | "cursor3d" => Ok(PivotMode::Cursor3D),
            "individual" | "individual-origins" => Ok(PivotMode::IndividualOrigins),
            "active" | "active-element" => Ok(PivotMode::ActiveElement),
            _ => Err(TransformError::UnknownPivotMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pivot {
    Point(Vec3),
    /// No shared pivot: each root uses its own world origin.
    IndividualOrigins,
}

/// A pivot together with the mode that produced it, after fallbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPivot {
    pub mode: PivotMode,
    pub pivot: Pivot,
}

/// Arithmetic mean of the world origins of `roots`.
pub fn median_center(scene: &Scene, roots: &[ObjectId]) -> Vec3 {
    let origins: Vec<Vec3> = roots
        .iter()
        .filter_map(|&id| scene.world_origin(id))
        .collect();

    if origins.is_empty() {
        return Vec3::ZERO;
    }

    origins.iter().sum::<Vec3>() / origins.len() as f32
}

/// Centre of the world-space box enclosing every root. Roots with geometry
/// contribute their transformed local bounds, the rest their origin.
pub fn bounding_box_center(scene: &Scene, roots: &[ObjectId]) -> Vec3 {
    let mut bounds: Option<AABB> = None;

    for &id in roots {
        let Some(object) = scene.get_object(id) else {
            continue;
        };
        let Some(world_matrix) = scene.world_matrix(id) else {
            continue;
        };

        let object_bounds = match object.mesh.as_ref().and_then(|mesh| mesh.bounding_box()) {
            Some(local_bounds) => local_bounds.transformed(&world_matrix),
            None => {
                let origin = world_matrix.w_axis.truncate();
                AABB::new(origin, origin)
            }
        };

        bounds = Some(match bounds {
            Some(bounds) => bounds.union(&object_bounds),
            None => object_bounds,
        });
    }

    bounds.map(|bounds| bounds.center()).unwrap_or(Vec3::ZERO)
}

fn resolve_mode(
    scene: &Scene,
    roots: &[ObjectId],
    mode: PivotMode,
    host: &dyn HostContext,
) -> Option<Pivot> {
    match mode {
        PivotMode::CollectionCenter => Some(Pivot::Point(median_center(scene, roots))),
        PivotMode::BoundingBoxCenter => Some(Pivot::Point(bounding_box_center(scene, roots))),
        PivotMode::Cursor3D => host.cursor_location().map(Pivot::Point),
        PivotMode::IndividualOrigins => Some(Pivot::IndividualOrigins),
        PivotMode::ActiveElement => host.active_location().map(Pivot::Point),
    }
}

/// Resolves the host's pivot mode against the current root set.
///
/// Returns `None` for an empty root set: there is nothing to transform and
/// the caller skips the operation. A mode the host cannot serve (no mode
/// reported, no cursor, no active object) falls back to `fallback`, and from
/// there to the collection centre.
pub fn resolve_pivot(
    scene: &Scene,
    roots: &[ObjectId],
    host: &dyn HostContext,
    fallback: PivotMode,
) -> Option<ResolvedPivot> {
    if roots.is_empty() {
        return None;
    }

    let requested = host.pivot_mode().unwrap_or(fallback);
    if let Some(pivot) = resolve_mode(scene, roots, requested, host) {
        return Some(ResolvedPivot {
            mode: requested,
            pivot,
        });
    }

    log::warn!(
        "Pivot {} unavailable, falling back to {}",
        requested,
        fallback
    );

    let (mode, pivot) = match resolve_mode(scene, roots, fallback, host) {
        Some(pivot) => (fallback, pivot),
        None => (
            PivotMode::CollectionCenter,
            Pivot::Point(median_center(scene, roots)),
        ),
    };

    Some(ResolvedPivot { mode, pivot })
}
