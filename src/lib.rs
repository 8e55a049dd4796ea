pub mod math;
pub mod scene_graph;
pub mod tool;

pub use scene_graph::{Collection, CollectionId, Object3D, ObjectId, Scene};
pub use tool::{
    ApplyOutcome, HostContext, History, PivotMode, SessionContext, ToolConfig, TransformDelta,
    TransformError,
};
