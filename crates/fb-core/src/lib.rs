pub mod config;
pub mod dnd;
pub mod error;
pub mod factory;
pub mod id;
pub mod model;
pub mod render;
pub mod structure;
pub mod template;
pub mod tree;
pub mod validate;

pub use config::DragDropConfig;
pub use dnd::{DropDescriptor, DropOutcome, DropPayload, DropPosition, NodeFactory, RawDropDescriptor, apply_drop};
pub use error::{DropError, ImportError, ModelError};
pub use factory::{ComponentFactory, create_component};
pub use id::NodeId;
pub use model::*;
pub use render::{ComponentRenderer, OutlineRenderer, RenderMode, render_tree};
pub use structure::{StructureIssue, check_structure};
pub use template::{ensure_well_formed, export_template, import_template, import_template_with};
pub use validate::{ValidationIssue, ValidationReport, validate_component, validate_page, validate_template};
