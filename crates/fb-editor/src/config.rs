use crate::history::DEFAULT_HISTORY_LIMIT;
use fb_core::DragDropConfig;
use serde::{Deserialize, Serialize};

/// Session-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub drag_drop: DragDropConfig,
    /// Undo depth; the oldest snapshot is dropped past this.
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drag_drop: DragDropConfig::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}
