use glam::Vec3;

use crate::scene_graph::CollectionId;
use crate::tool::pivot::PivotMode;

/// Live host state, pulled on demand at the start of every operation.
///
/// Every accessor may report `None` when the host cannot provide the value;
/// callers fall back to their documented defaults instead of failing.
pub trait HostContext {
    /// Collection currently selected in the host's outliner.
    fn selected_collection(&self) -> Option<CollectionId>;

    fn pivot_mode(&self) -> Option<PivotMode>;

    fn cursor_location(&self) -> Option<Vec3>;

    /// World-space origin of the active object.
    fn active_location(&self) -> Option<Vec3>;
}

/// Host state held in plain fields, for the command line and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    pub collection: Option<CollectionId>,
    pub pivot_mode: Option<PivotMode>,
    pub cursor: Option<Vec3>,
    pub active: Option<Vec3>,
}

impl StaticHost {
    pub fn with_collection(collection: CollectionId) -> Self {
        Self {
            collection: Some(collection),
            ..Default::default()
        }
    }
}

impl HostContext for StaticHost {
    fn selected_collection(&self) -> Option<CollectionId> {
        self.collection
    }

    fn pivot_mode(&self) -> Option<PivotMode> {
        self.pivot_mode
    }

    fn cursor_location(&self) -> Option<Vec3> {
        self.cursor
    }

    fn active_location(&self) -> Option<Vec3> {
        self.active
    }
}
