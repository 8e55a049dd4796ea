//! Error types for collection transform operations.

use thiserror::Error;

/// Errors that abort a collection transform before anything is mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// No collection is selected in the host.
    #[error("no collection selected")]
    NoSelection,

    /// The host selected a collection that is not part of the scene.
    #[error("selected collection does not exist in the scene")]
    UnknownCollection,

    /// A scale component below the allowed floor.
    #[error("scale {axis} must be at least {floor}, got {value}")]
    InvalidScale {
        /// Axis name, `x`, `y` or `z`.
        axis: char,
        /// The rejected value.
        value: f32,
        /// The enforced floor.
        floor: f32,
    },

    /// A pivot mode name that does not match any mode.
    #[error("unknown pivot mode: {0}")]
    UnknownPivotMode(String),
}

/// Result type for collection transform operations.
pub type TransformResult<T> = Result<T, TransformError>;
