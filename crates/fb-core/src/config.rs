//! Drag-drop engine configuration.

use serde::{Deserialize, Serialize};

/// Default maximum number of children in a horizontal layout.
pub const DEFAULT_MAX_HORIZONTAL_CHILDREN: usize = 4;

/// Configuration for `dnd::apply_drop`.
///
/// Every switch defaults to **true**. The UI shell may send a partial JSON
/// object; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragDropConfig {
    /// `left`/`right` drops build or extend horizontal layouts. When off they
    /// behave like `before`/`after`.
    pub enable_horizontal_layouts: bool,

    /// `before`/`after` drops are accepted. When off they are rejected.
    pub enable_vertical_reordering: bool,

    /// Moves may change the container a node lives in.
    pub enable_cross_layout_movement: bool,

    /// Layouts shrinking to one child are replaced by that child, and
    /// layouts shrinking to none are removed.
    pub auto_dissolve_empty_layouts: bool,

    /// Capacity of a horizontal layout.
    pub max_horizontal_children: usize,
}

impl Default for DragDropConfig {
    fn default() -> Self {
        Self {
            enable_horizontal_layouts: true,
            enable_vertical_reordering: true,
            enable_cross_layout_movement: true,
            auto_dissolve_empty_layouts: true,
            max_horizontal_children: DEFAULT_MAX_HORIZONTAL_CHILDREN,
        }
    }
}
