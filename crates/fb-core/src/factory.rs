//! Component factory: fresh ids, sequential field ids, type defaults.

use crate::error::ModelError;
use crate::id::NodeId;
use crate::model::{ComponentNode, ComponentType, FieldOption, FormPage};
use crate::tree::walk;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Creates new components for one editing session.
///
/// Seeded from the pages already in the session so generated ids never
/// collide with imported ones and each type's `fieldId` sequence continues
/// past the highest number already in use.
#[derive(Debug, Clone, Default)]
pub struct ComponentFactory {
    taken_ids: HashSet<NodeId>,
    sequences: HashMap<ComponentType, u32>,
}

impl ComponentFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a factory that knows every id and field id in `pages`.
    pub fn for_pages(pages: &[FormPage]) -> Self {
        let mut factory = Self::new();
        factory.observe_pages(pages);
        factory
    }

    /// Record the ids and field ids of existing components.
    pub fn observe_pages(&mut self, pages: &[FormPage]) {
        for page in pages {
            self.taken_ids.insert(page.id);
            walk(&page.components, &mut |node| self.observe(node));
        }
    }

    fn observe(&mut self, node: &ComponentNode) {
        self.taken_ids.insert(node.id);
        let seq = node
            .field_id
            .strip_prefix(node.kind.tag())
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|n| n.parse::<u32>().ok());
        if let Some(n) = seq {
            let current = self.sequences.entry(node.kind).or_insert(0);
            *current = (*current).max(n);
        }
    }

    /// A process-unique id that is also unique within the observed form.
    pub fn next_id(&mut self, prefix: &str) -> NodeId {
        loop {
            let id = NodeId::with_prefix(prefix);
            if self.taken_ids.insert(id) {
                return id;
            }
        }
    }

    fn next_field_id(&mut self, kind: ComponentType) -> String {
        let seq = self.sequences.entry(kind).or_insert(0);
        *seq += 1;
        format!("{}_{}", kind.tag(), seq)
    }

    /// Create a component of `kind` with type-appropriate defaults.
    pub fn create(&mut self, kind: ComponentType) -> ComponentNode {
        let id = self.next_id(kind.tag());
        let mut node = ComponentNode::new(id, kind);
        node.field_id = self.next_field_id(kind);
        apply_defaults(&mut node);
        log::trace!("created {} as {}", kind, node.id);
        node
    }

    /// Create a component from its wire tag.
    ///
    /// # Errors
    /// `UnknownComponentType` if `tag` is not a known component type.
    pub fn create_from_tag(&mut self, tag: &str) -> Result<ComponentNode, ModelError> {
        let kind = tag.parse::<ComponentType>()?;
        Ok(self.create(kind))
    }

    /// Deep copy of `node` where every node in the subtree receives a fresh
    /// id and field id. Everything else is carried over.
    pub fn duplicate(&mut self, node: &ComponentNode) -> ComponentNode {
        let mut copy = node.clone();
        copy.id = self.next_id(node.kind.tag());
        copy.field_id = self.next_field_id(node.kind);
        if let Some(children) = &node.children {
            copy.children = Some(
                children
                    .iter()
                    .map(|child| Arc::new(self.duplicate(child)))
                    .collect(),
            );
        }
        copy
    }
}

/// Create a component with a throwaway factory.
///
/// Ids are still process-unique; field ids restart at 1 per call site, so
/// sessions should prefer their own `ComponentFactory`.
pub fn create_component(kind: ComponentType) -> ComponentNode {
    ComponentFactory::new().create(kind)
}

fn apply_defaults(node: &mut ComponentNode) {
    node.label = node.kind.display_name().to_string();
    match node.kind {
        ComponentType::TextInput => {
            node.placeholder = Some("Enter text".into());
        }
        ComponentType::EmailInput => {
            node.placeholder = Some("name@example.com".into());
        }
        ComponentType::PasswordInput => {
            node.placeholder = Some("Enter password".into());
        }
        ComponentType::NumberInput => {
            node.placeholder = Some("0".into());
            node.step = Some(1.0);
        }
        ComponentType::Textarea => {
            node.placeholder = Some("Enter text".into());
            node.rows = Some(4);
        }
        ComponentType::Select | ComponentType::MultiSelect | ComponentType::RadioGroup => {
            node.options = Some(vec![
                FieldOption::labeled("Option 1", "option_1"),
                FieldOption::labeled("Option 2", "option_2"),
            ]);
        }
        ComponentType::FileUpload => {
            node.accepted_file_types = Some(vec![".pdf".into(), ".png".into(), ".jpg".into()]);
        }
        ComponentType::Card | ComponentType::Paragraph => {
            node.description = Some(String::new());
        }
        ComponentType::HorizontalLayout | ComponentType::VerticalLayout => {
            node.children = Some(Vec::new());
        }
        ComponentType::Checkbox
        | ComponentType::DatePicker
        | ComponentType::SectionDivider
        | ComponentType::Button
        | ComponentType::Heading => {}
    }
}
