//! Applying one world-space transform to a whole collection.

pub mod apply;
pub mod compose;
pub mod config;
pub mod delta;
pub mod error;
pub mod host;
pub mod pivot;
pub mod preview;
pub mod roots;
pub mod session;
pub mod undo;

pub use apply::{apply_plan, apply_transform, bake_rotations, plan_transform, TransformPlan};
pub use compose::compose_matrix;
pub use config::{ToolConfig, SCALE_FLOOR};
pub use delta::TransformDelta;
pub use error::{TransformError, TransformResult};
pub use host::{HostContext, StaticHost};
pub use pivot::{resolve_pivot, Pivot, PivotMode, ResolvedPivot};
pub use preview::{PreviewPhase, PreviewSession, PreviewSnapshot};
pub use roots::{select_roots, CollectionTarget};
pub use session::{ApplyOutcome, ApplyReport, SessionContext};
pub use undo::{History, Recording, UndoLog, UndoStep};
