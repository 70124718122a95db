//! Core data model for form definitions.
//!
//! A form is a list of pages; each page owns an ordered list of top-level
//! components. A component is either a leaf (an input, display, or control)
//! or a layout container that exclusively owns an ordered list of children.
//! Children are held behind `Arc` so edits copy only the path from the page
//! root to the touched node and share every other subtree.

use crate::error::ModelError;
use crate::id::NodeId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ─── Component types ─────────────────────────────────────────────────────

/// The closed set of component kinds a form can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    TextInput,
    EmailInput,
    PasswordInput,
    NumberInput,
    Textarea,
    Select,
    MultiSelect,
    Checkbox,
    RadioGroup,
    DatePicker,
    FileUpload,
    SectionDivider,
    HorizontalLayout,
    VerticalLayout,
    Button,
    Heading,
    Paragraph,
    Card,
}

impl ComponentType {
    pub const ALL: [ComponentType; 18] = [
        ComponentType::TextInput,
        ComponentType::EmailInput,
        ComponentType::PasswordInput,
        ComponentType::NumberInput,
        ComponentType::Textarea,
        ComponentType::Select,
        ComponentType::MultiSelect,
        ComponentType::Checkbox,
        ComponentType::RadioGroup,
        ComponentType::DatePicker,
        ComponentType::FileUpload,
        ComponentType::SectionDivider,
        ComponentType::HorizontalLayout,
        ComponentType::VerticalLayout,
        ComponentType::Button,
        ComponentType::Heading,
        ComponentType::Paragraph,
        ComponentType::Card,
    ];

    /// The wire tag, e.g. `"radio_group"`.
    pub fn tag(self) -> &'static str {
        match self {
            ComponentType::TextInput => "text_input",
            ComponentType::EmailInput => "email_input",
            ComponentType::PasswordInput => "password_input",
            ComponentType::NumberInput => "number_input",
            ComponentType::Textarea => "textarea",
            ComponentType::Select => "select",
            ComponentType::MultiSelect => "multi_select",
            ComponentType::Checkbox => "checkbox",
            ComponentType::RadioGroup => "radio_group",
            ComponentType::DatePicker => "date_picker",
            ComponentType::FileUpload => "file_upload",
            ComponentType::SectionDivider => "section_divider",
            ComponentType::HorizontalLayout => "horizontal_layout",
            ComponentType::VerticalLayout => "vertical_layout",
            ComponentType::Button => "button",
            ComponentType::Heading => "heading",
            ComponentType::Paragraph => "paragraph",
            ComponentType::Card => "card",
        }
    }

    /// Human-readable name, used as the default label.
    pub fn display_name(self) -> &'static str {
        match self {
            ComponentType::TextInput => "Text Input",
            ComponentType::EmailInput => "Email",
            ComponentType::PasswordInput => "Password",
            ComponentType::NumberInput => "Number",
            ComponentType::Textarea => "Text Area",
            ComponentType::Select => "Select",
            ComponentType::MultiSelect => "Multi Select",
            ComponentType::Checkbox => "Checkbox",
            ComponentType::RadioGroup => "Radio Group",
            ComponentType::DatePicker => "Date",
            ComponentType::FileUpload => "File Upload",
            ComponentType::SectionDivider => "Section",
            ComponentType::HorizontalLayout => "Horizontal Layout",
            ComponentType::VerticalLayout => "Vertical Layout",
            ComponentType::Button => "Submit",
            ComponentType::Heading => "Heading",
            ComponentType::Paragraph => "Paragraph",
            ComponentType::Card => "Card",
        }
    }

    /// Layout containers own children; everything else is a leaf.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            ComponentType::HorizontalLayout | ComponentType::VerticalLayout
        )
    }

    /// Kinds whose `options` list is meaningful.
    pub fn accepts_options(self) -> bool {
        matches!(
            self,
            ComponentType::Select | ComponentType::MultiSelect | ComponentType::RadioGroup
        )
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ComponentType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| ModelError::UnknownComponentType(s.to_string()))
    }
}

// ─── Options ─────────────────────────────────────────────────────────────

/// One entry of a select / radio / multi-select option list.
/// Accepts both `{"label": "...", "value": "..."}` and bare strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOption {
    Labeled { label: String, value: String },
    Plain(String),
}

impl FieldOption {
    pub fn labeled(label: impl Into<String>, value: impl Into<String>) -> Self {
        FieldOption::Labeled {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FieldOption::Labeled { label, .. } => label,
            FieldOption::Plain(s) => s,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            FieldOption::Labeled { value, .. } => value,
            FieldOption::Plain(s) => s,
        }
    }
}

// ─── Component nodes ─────────────────────────────────────────────────────

/// A single node in a page's component tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    /// Unique within a form, immutable after creation.
    pub id: NodeId,

    #[serde(rename = "type")]
    pub kind: ComponentType,

    #[serde(default)]
    pub label: String,

    /// Submission key, derived from type + sequence.
    #[serde(default)]
    pub field_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_file_types: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Present only on layout containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Arc<ComponentNode>>>,
}

impl ComponentNode {
    /// A bare node with no type-specific defaults. Containers start with an
    /// empty child list; see `factory::create_component` for full defaults.
    pub fn new(id: NodeId, kind: ComponentType) -> Self {
        Self {
            id,
            kind,
            label: String::new(),
            field_id: String::new(),
            placeholder: None,
            required: false,
            options: None,
            min: None,
            max: None,
            step: None,
            rows: None,
            accepted_file_types: None,
            help_text: None,
            description: None,
            children: kind.is_container().then(Vec::new),
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// Child slice; empty for leaves.
    pub fn children(&self) -> &[Arc<ComponentNode>] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Shallow copy of this node with a replaced child list.
    /// Sibling subtrees stay shared.
    pub fn with_children(&self, children: Vec<Arc<ComponentNode>>) -> Self {
        Self {
            children: Some(children),
            ..self.clone_shallow()
        }
    }

    /// Clone every field except `children`, which is left as `None`.
    fn clone_shallow(&self) -> Self {
        Self {
            id: self.id,
            kind: self.kind,
            label: self.label.clone(),
            field_id: self.field_id.clone(),
            placeholder: self.placeholder.clone(),
            required: self.required,
            options: self.options.clone(),
            min: self.min,
            max: self.max,
            step: self.step,
            rows: self.rows,
            accepted_file_types: self.accepted_file_types.clone(),
            help_text: self.help_text.clone(),
            description: self.description.clone(),
            children: None,
        }
    }

    /// Apply a partial update. `id`, `type`, `fieldId`, and `children` are
    /// never touched by a patch.
    pub fn patched(&self, patch: &ComponentPatch) -> Self {
        let mut node = self.clone();
        if let Some(label) = &patch.label {
            node.label = label.clone();
        }
        if let Some(placeholder) = &patch.placeholder {
            node.placeholder = placeholder.clone();
        }
        if let Some(required) = patch.required {
            node.required = required;
        }
        if let Some(options) = &patch.options {
            node.options = options.clone();
        }
        if let Some(min) = patch.min {
            node.min = min;
        }
        if let Some(max) = patch.max {
            node.max = max;
        }
        if let Some(step) = patch.step {
            node.step = step;
        }
        if let Some(rows) = patch.rows {
            node.rows = rows;
        }
        if let Some(types) = &patch.accepted_file_types {
            node.accepted_file_types = types.clone();
        }
        if let Some(help) = &patch.help_text {
            node.help_text = help.clone();
        }
        if let Some(description) = &patch.description {
            node.description = description.clone();
        }
        node
    }
}

// ─── Patches ─────────────────────────────────────────────────────────────

/// Partial update for a component.
///
/// Outer `None` leaves a field alone. For nullable fields the inner option
/// distinguishes "set" from "clear" (`"min": null` clears the bound).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub options: Option<Option<Vec<FieldOption>>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub min: Option<Option<f64>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub max: Option<Option<f64>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub step: Option<Option<f64>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub rows: Option<Option<u32>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub accepted_file_types: Option<Option<Vec<String>>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub help_text: Option<Option<String>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl ComponentPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A present key always yields `Some`, so `null` becomes `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ─── Pages & templates ───────────────────────────────────────────────────

/// One page of a multi-page form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormPage {
    pub id: NodeId,
    pub title: String,
    #[serde(default)]
    pub components: Vec<Arc<ComponentNode>>,
}

impl FormPage {
    pub fn new(id: NodeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            components: Vec::new(),
        }
    }
}

/// The exported form definition: `{ templateName, pages }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    pub template_name: String,
    pub pages: Vec<FormPage>,
}
