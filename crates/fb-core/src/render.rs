//! Render collaborator seam.
//!
//! The core never draws anything. A UI layer implements `ComponentRenderer`
//! and `render_tree` walks a page bottom-up, handing each node the already
//! rendered output of its children.

use crate::id::NodeId;
use crate::model::ComponentNode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;

/// Builder mode shows editing affordances; preview shows the form as filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Builder,
    Preview,
}

/// Turns one component (plus its rendered children) into opaque output.
pub trait ComponentRenderer {
    type Output;

    fn render_component(
        &mut self,
        node: &ComponentNode,
        mode: RenderMode,
        children: Vec<Self::Output>,
    ) -> Self::Output;
}

/// Render every top-level component of a page.
pub fn render_tree<R: ComponentRenderer>(
    renderer: &mut R,
    list: &[Arc<ComponentNode>],
    mode: RenderMode,
) -> Vec<R::Output> {
    let mut seen = HashSet::new();
    render_list(renderer, list, mode, &mut seen)
}

fn render_list<R: ComponentRenderer>(
    renderer: &mut R,
    list: &[Arc<ComponentNode>],
    mode: RenderMode,
    seen: &mut HashSet<NodeId>,
) -> Vec<R::Output> {
    let mut out = Vec::with_capacity(list.len());
    for node in list {
        if !seen.insert(node.id) {
            log::warn!("render: {} already rendered, skipping", node.id);
            continue;
        }
        let children = render_list(renderer, node.children(), mode, seen);
        out.push(renderer.render_component(node, mode, children));
    }
    out
}

// ─── Outline renderer ────────────────────────────────────────────────────

/// Plain-text renderer: one line per component, children indented.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineRenderer;

impl ComponentRenderer for OutlineRenderer {
    type Output = String;

    fn render_component(
        &mut self,
        node: &ComponentNode,
        mode: RenderMode,
        children: Vec<String>,
    ) -> String {
        let mut line = match mode {
            RenderMode::Builder => format!("[{}] {} ({})", node.kind, node.label, node.id),
            RenderMode::Preview if node.is_container() => format!("[{}]", node.kind),
            RenderMode::Preview => node.label.clone(),
        };
        if node.required && mode == RenderMode::Preview {
            line.push_str(" *");
        }
        for child in children {
            for child_line in child.lines() {
                let _ = write!(line, "\n  {child_line}");
            }
        }
        line
    }
}

/// Render a page as an indented text outline.
pub fn outline(list: &[Arc<ComponentNode>], mode: RenderMode) -> String {
    render_tree(&mut OutlineRenderer, list, mode).join("\n")
}
