//! Shape checks for component trees coming from outside the editor.
//!
//! The tree is projected onto a `petgraph` id graph (container id → child
//! id). Reused ids collapse onto one graph node, so an id that reappears
//! below itself shows up as a graph cycle.

use crate::id::NodeId;
use crate::model::{ComponentNode, ComponentType, FormPage};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// A structural defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureIssue {
    /// A component is (transitively) its own ancestor.
    Cycle(NodeId),
    /// The same component id appears more than once in a form.
    DuplicateId(NodeId),
    /// Two pages share an id.
    DuplicatePageId(NodeId),
    /// A leaf carries a `children` list.
    ChildrenOnLeaf(NodeId),
    /// A layout container has no `children` list.
    MissingChildren(NodeId),
    /// A horizontal layout holds more children than its capacity.
    OverCapacity { layout: NodeId, children: usize, capacity: usize },
}

impl fmt::Display for StructureIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureIssue::Cycle(id) => write!(f, "component {id} contains itself"),
            StructureIssue::DuplicateId(id) => write!(f, "component id {id} is used more than once"),
            StructureIssue::DuplicatePageId(id) => write!(f, "page id {id} is used more than once"),
            StructureIssue::ChildrenOnLeaf(id) => write!(f, "leaf component {id} has children"),
            StructureIssue::MissingChildren(id) => write!(f, "layout {id} has no children list"),
            StructureIssue::OverCapacity {
                layout,
                children,
                capacity,
            } => write!(f, "layout {layout} holds {children} children, more than {capacity}"),
        }
    }
}

struct IdGraph {
    graph: DiGraph<NodeId, ()>,
    index: HashMap<NodeId, NodeIndex>,
    duplicates: Vec<NodeId>,
    capacity: usize,
}

impl IdGraph {
    fn node(&mut self, id: NodeId) -> (NodeIndex, bool) {
        if let Some(&idx) = self.index.get(&id) {
            return (idx, false);
        }
        let idx = self.graph.add_node(id);
        self.index.insert(id, idx);
        (idx, true)
    }

    fn add_list(&mut self, parent: Option<NodeIndex>, list: &[Arc<ComponentNode>], issues: &mut Vec<StructureIssue>) {
        for node in list {
            let (idx, fresh) = self.node(node.id);
            if !fresh {
                self.duplicates.push(node.id);
            }
            if let Some(parent) = parent {
                self.graph.add_edge(parent, idx, ());
            }
            match (node.is_container(), &node.children) {
                (false, Some(_)) => issues.push(StructureIssue::ChildrenOnLeaf(node.id)),
                (true, None) => issues.push(StructureIssue::MissingChildren(node.id)),
                _ => {}
            }
            if node.kind == ComponentType::HorizontalLayout && node.child_count() > self.capacity {
                issues.push(StructureIssue::OverCapacity {
                    layout: node.id,
                    children: node.child_count(),
                    capacity: self.capacity,
                });
            }
            // A reused id has already been expanded once; descending again
            // through a self-reference would never end on a real cycle.
            if fresh {
                self.add_list(Some(idx), node.children(), issues);
            }
        }
    }
}

/// Check every page for duplicate ids, cycles, children/type mismatches, and
/// horizontal layouts holding more than `max_horizontal_children`.
///
/// Returns all issues found; an empty list means the form is well formed.
#[must_use]
pub fn check_structure(pages: &[FormPage], max_horizontal_children: usize) -> Vec<StructureIssue> {
    let mut issues = Vec::new();

    let mut page_ids = HashSet::new();
    for page in pages {
        if !page_ids.insert(page.id) {
            issues.push(StructureIssue::DuplicatePageId(page.id));
        }
    }

    let mut ids = IdGraph {
        graph: DiGraph::new(),
        index: HashMap::new(),
        duplicates: Vec::new(),
        capacity: max_horizontal_children,
    };
    for page in pages {
        ids.add_list(None, &page.components, &mut issues);
    }

    if let Err(cycle) = toposort(&ids.graph, None) {
        let id = ids.graph[cycle.node_id()];
        issues.push(StructureIssue::Cycle(id));
    }

    let mut reported = HashSet::new();
    for id in ids.duplicates {
        if reported.insert(id) {
            issues.push(StructureIssue::DuplicateId(id));
        }
    }

    issues
}
