use crate::tool::pivot::PivotMode;

/// Smallest scale component a property setter accepts.
pub const SCALE_FLOOR: f32 = 0.0001;

#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Scale components are clamped to at least this value.
    pub scale_floor: f32,
    /// Used whenever the host cannot report a pivot mode, or the requested
    /// mode lacks its input (no cursor, no active object).
    pub fallback_pivot: PivotMode,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            scale_floor: SCALE_FLOOR,
            fallback_pivot: PivotMode::CollectionCenter,
        }
    }
}
