use fb_core::{DropError, ImportError, ModelError, NodeId};
use thiserror::Error;

/// Why an action (or import) did not apply. The session state is unchanged
/// whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error(transparent)]
    Drop(#[from] DropError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("cannot delete the last page")]
    LastPageDeletion,

    #[error("page {0} not found")]
    PageNotFound(NodeId),

    #[error("component {0} not found")]
    ComponentNotFound(NodeId),

    #[error("page title must not be empty")]
    InvalidPageTitle,

    #[error("index {index} is out of range for {len} components")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("export failed: {0}")]
    Export(String),
}
