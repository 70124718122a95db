//! Error taxonomy for the component model and the drag-drop engine.
//!
//! Every variant is recoverable: an `Err` means the requested edit did not
//! apply and the caller's tree is untouched.

use crate::id::NodeId;
use crate::model::ComponentType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Unknown component type: {0:?}")]
    UnknownComponentType(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropError {
    #[error("Unknown drop position: {0:?}")]
    UnknownDropPosition(String),
    #[error("Drop target not found: {0}")]
    TargetNotFound(NodeId),
    #[error("Source component not found: {0}")]
    SourceComponentNotFound(NodeId),
    #[error("Circular structure detected at {0}")]
    CircularStructure(NodeId),
    #[error("Layout {layout} already holds the maximum of {capacity} children")]
    CapacityExceeded { layout: NodeId, capacity: usize },
    #[error("Drop target {id} is a {kind:?}, not a layout container")]
    NotAContainer { id: NodeId, kind: ComponentType },
    #[error("Cannot drop {source_id} onto {target}, which lies inside it")]
    TargetInsideSource { source_id: NodeId, target: NodeId },
    #[error("Moving {0} into a different container is disabled")]
    CrossLayoutMoveDisabled(NodeId),
    #[error("Drop position {0} is disabled by configuration")]
    PositionDisabled(&'static str),
    #[error("Drop carries neither a component type nor a source component")]
    MissingPayload,
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Malformed import: {0}")]
    MalformedImport(String),
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::MalformedImport(err.to_string())
    }
}
