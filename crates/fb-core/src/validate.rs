//! Structural validation of components, pages, and templates.
//!
//! Reports problems without modifying anything. Container errors bubble up
//! from their children, prefixed with the child's 1-based position.

use crate::id::NodeId;
use crate::model::{ComponentNode, ComponentType, FormPage, FormTemplate};

pub const LABEL_REQUIRED: &str = "Label is required";
pub const OPTIONS_REQUIRED: &str = "At least one option is required";
pub const MIN_LESS_THAN_MAX: &str = "Minimum value must be less than maximum value";
pub const STEP_POSITIVE: &str = "Step must be greater than zero";
pub const ROWS_POSITIVE: &str = "Rows must be at least 1";
pub const TITLE_REQUIRED: &str = "Page title is required";

// ─── Report types ────────────────────────────────────────────────────────

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The component (or page) the finding refers to.
    pub node_id: NodeId,
    /// Human-readable message, including any position prefix.
    pub message: String,
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Messages in discovery order.
    pub fn errors(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.message.as_str()).collect()
    }

    fn push(&mut self, node_id: NodeId, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            node_id,
            message: message.into(),
        });
    }
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Validate one component and, for containers, every descendant.
#[must_use]
pub fn validate_component(node: &ComponentNode) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_node(node, "", &mut report, 0);
    report
}

/// Validate a page title and every component on the page.
#[must_use]
pub fn validate_page(page: &FormPage) -> ValidationReport {
    let mut report = ValidationReport::default();
    if page.title.trim().is_empty() {
        report.push(page.id, TITLE_REQUIRED);
    }
    for (i, node) in page.components.iter().enumerate() {
        check_node(node, &format!("Component {}: ", i + 1), &mut report, 0);
    }
    report
}

/// Validate every page of a template.
#[must_use]
pub fn validate_template(template: &FormTemplate) -> ValidationReport {
    let mut report = ValidationReport::default();
    for page in &template.pages {
        let name = if page.title.trim().is_empty() {
            page.id.as_str()
        } else {
            page.title.as_str()
        };
        let page_report = validate_page(page);
        report.issues.extend(page_report.issues.into_iter().map(|issue| ValidationIssue {
            message: format!("{name}: {}", issue.message),
            ..issue
        }));
    }
    report
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Nesting deeper than this is reported instead of descended into.
const MAX_DEPTH: usize = 64;

fn check_node(node: &ComponentNode, prefix: &str, report: &mut ValidationReport, depth: usize) {
    if depth > MAX_DEPTH {
        report.push(node.id, format!("{prefix}Nesting is too deep"));
        return;
    }

    if node.is_container() {
        for (i, child) in node.children().iter().enumerate() {
            if child.id == node.id {
                report.push(node.id, format!("{prefix}Layout contains itself"));
                continue;
            }
            let child_prefix = format!("{prefix}Child {}: ", i + 1);
            check_node(child, &child_prefix, report, depth + 1);
        }
        return;
    }

    if node.label.trim().is_empty() {
        report.push(node.id, format!("{prefix}{LABEL_REQUIRED}"));
    }

    if node.kind.accepts_options() && node.options.as_ref().is_none_or(Vec::is_empty) {
        report.push(node.id, format!("{prefix}{OPTIONS_REQUIRED}"));
    }

    if node.kind == ComponentType::NumberInput {
        if let (Some(min), Some(max)) = (node.min, node.max)
            && min >= max
        {
            report.push(node.id, format!("{prefix}{MIN_LESS_THAN_MAX}"));
        }
        if node.step.is_some_and(|step| step <= 0.0) {
            report.push(node.id, format!("{prefix}{STEP_POSITIVE}"));
        }
    }

    if node.kind == ComponentType::Textarea && node.rows == Some(0) {
        report.push(node.id, format!("{prefix}{ROWS_POSITIVE}"));
    }
}
