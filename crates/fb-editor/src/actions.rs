//! The closed set of editing actions.
//!
//! Actions arrive from the UI shell as JSON objects tagged by `type`:
//!
//! ```json
//! { "type": "dropComponent", "drop": { "positionKind": "left", "targetId": "T1", "componentType": "email_input" } }
//! ```

use crate::error::EditorError;
use fb_core::{ComponentPatch, NodeId, RawDropDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FormAction {
    /// Create a component on the current page. Appends unless `index` is set.
    AddComponent {
        component_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    UpdateComponent {
        id: NodeId,
        patch: ComponentPatch,
    },
    DeleteComponent {
        id: NodeId,
    },
    /// Reorder the current page's top-level list.
    MoveComponent {
        from: usize,
        to: usize,
    },
    /// Drop a new or existing component relative to a target.
    DropComponent {
        drop: RawDropDescriptor,
    },
    DuplicateComponent {
        id: NodeId,
    },
    SelectComponent {
        #[serde(default)]
        id: Option<NodeId>,
    },
    AddPage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    DeletePage {
        id: NodeId,
    },
    RenamePage {
        id: NodeId,
        title: String,
    },
    SwitchPage {
        id: NodeId,
    },
}

impl FormAction {
    /// Parse an action from its JSON form.
    ///
    /// # Errors
    /// `UnknownAction` for an unrecognized `type` tag or a malformed payload.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        serde_json::from_str(json).map_err(|e| {
            log::warn!("rejected action: {e}");
            EditorError::UnknownAction(e.to_string())
        })
    }

    /// Parse a JSON array of actions.
    ///
    /// # Errors
    /// `UnknownAction` if any element has an unrecognized tag or payload;
    /// nothing is returned for the rest of the batch.
    pub fn batch_from_json(json: &str) -> Result<Vec<Self>, EditorError> {
        serde_json::from_str(json).map_err(|e| {
            log::warn!("rejected action batch: {e}");
            EditorError::UnknownAction(e.to_string())
        })
    }

    /// The wire tag, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            FormAction::AddComponent { .. } => "addComponent",
            FormAction::UpdateComponent { .. } => "updateComponent",
            FormAction::DeleteComponent { .. } => "deleteComponent",
            FormAction::MoveComponent { .. } => "moveComponent",
            FormAction::DropComponent { .. } => "dropComponent",
            FormAction::DuplicateComponent { .. } => "duplicateComponent",
            FormAction::SelectComponent { .. } => "selectComponent",
            FormAction::AddPage { .. } => "addPage",
            FormAction::DeletePage { .. } => "deletePage",
            FormAction::RenamePage { .. } => "renamePage",
            FormAction::SwitchPage { .. } => "switchPage",
        }
    }

    /// Selection changes are not undoable.
    pub fn is_recorded(&self) -> bool {
        !matches!(self, FormAction::SelectComponent { .. })
    }
}
