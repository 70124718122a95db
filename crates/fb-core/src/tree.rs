//! Persistent operations over a page's component tree.
//!
//! Every function takes the top-level list by reference and returns a new
//! list. Only the nodes on the path from the top level to the touched node
//! are copied; every other subtree is shared through its `Arc`.
//!
//! Traversals keep a visited-id set. A node whose id was already seen during
//! the same traversal is treated as a circular reference: a warning is logged
//! and that branch is skipped as if it did not exist.

use crate::factory::ComponentFactory;
use crate::id::NodeId;
use crate::model::{ComponentNode, ComponentPatch, ComponentType};
use smallvec::SmallVec;
use std::collections::HashSet;
use std::sync::Arc;

/// Child-index path from the top-level list down to a list.
pub type TreePath = SmallVec<[usize; 8]>;

// ─── Cycle guard ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Visited {
    seen: HashSet<NodeId>,
}

impl Visited {
    fn enter(&mut self, node: &ComponentNode) -> bool {
        if self.seen.insert(node.id) {
            true
        } else {
            log::warn!("circular structure at {}: skipping branch", node.id);
            false
        }
    }
}

// ─── Lookup ──────────────────────────────────────────────────────────────

/// The container a located node sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef {
    pub id: NodeId,
    pub kind: ComponentType,
    pub child_count: usize,
}

/// Where a node sits in the tree.
#[derive(Debug, Clone)]
pub struct Location {
    /// Path to the list holding the node (empty for top level).
    pub parent_path: TreePath,
    /// Index of the node within that list.
    pub index: usize,
    pub node: Arc<ComponentNode>,
    /// `None` when the node is top-level.
    pub parent: Option<ParentRef>,
}

impl Location {
    /// Full path to the node itself.
    pub fn path(&self) -> TreePath {
        let mut path = self.parent_path.clone();
        path.push(self.index);
        path
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent.map(|p| p.id)
    }

    pub fn in_horizontal_layout(&self) -> bool {
        self.parent
            .is_some_and(|p| p.kind == ComponentType::HorizontalLayout)
    }
}

/// Depth-first search for `id`.
pub fn find(list: &[Arc<ComponentNode>], id: NodeId) -> Option<&Arc<ComponentNode>> {
    find_in(list, id, &mut Visited::default())
}

fn find_in<'a>(
    list: &'a [Arc<ComponentNode>],
    id: NodeId,
    visited: &mut Visited,
) -> Option<&'a Arc<ComponentNode>> {
    for node in list {
        if !visited.enter(node) {
            continue;
        }
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in(node.children(), id, visited) {
            return Some(found);
        }
    }
    None
}

pub fn contains(list: &[Arc<ComponentNode>], id: NodeId) -> bool {
    find(list, id).is_some()
}

/// Depth-first search for `id`, returning its position and parent.
pub fn locate(list: &[Arc<ComponentNode>], id: NodeId) -> Option<Location> {
    let mut path = TreePath::new();
    locate_in(list, id, &mut path, None, &mut Visited::default())
}

fn locate_in(
    list: &[Arc<ComponentNode>],
    id: NodeId,
    path: &mut TreePath,
    parent: Option<&ComponentNode>,
    visited: &mut Visited,
) -> Option<Location> {
    for (index, node) in list.iter().enumerate() {
        if !visited.enter(node) {
            continue;
        }
        if node.id == id {
            return Some(Location {
                parent_path: path.clone(),
                index,
                node: node.clone(),
                parent: parent.map(|p| ParentRef {
                    id: p.id,
                    kind: p.kind,
                    child_count: p.child_count(),
                }),
            });
        }
        if node.is_container() {
            path.push(index);
            if let Some(found) = locate_in(node.children(), id, path, Some(node), visited) {
                return Some(found);
            }
            path.pop();
        }
    }
    None
}

fn node_at<'a>(list: &'a [Arc<ComponentNode>], path: &[usize]) -> Option<&'a Arc<ComponentNode>> {
    let (&last, ancestors) = path.split_last()?;
    let mut current = list;
    for &i in ancestors {
        current = current.get(i)?.children();
    }
    current.get(last)
}

/// The container directly holding `id`; `None` at top level or if absent.
pub fn parent_container(list: &[Arc<ComponentNode>], id: NodeId) -> Option<Arc<ComponentNode>> {
    let loc = locate(list, id)?;
    node_at(list, &loc.parent_path).cloned()
}

/// Whether `id` is `ancestor` itself or anywhere below it.
pub fn is_within(list: &[Arc<ComponentNode>], ancestor: NodeId, id: NodeId) -> bool {
    match find(list, ancestor) {
        Some(node) => node.id == id || contains(node.children(), id),
        None => false,
    }
}

/// Visit every reachable node in depth-first pre-order.
pub fn walk(list: &[Arc<ComponentNode>], visit: &mut dyn FnMut(&ComponentNode)) {
    walk_in(list, visit, &mut Visited::default());
}

fn walk_in(list: &[Arc<ComponentNode>], visit: &mut dyn FnMut(&ComponentNode), visited: &mut Visited) {
    for node in list {
        if !visited.enter(node) {
            continue;
        }
        visit(node);
        walk_in(node.children(), visit, visited);
    }
}

/// Ids met more than once in a single traversal, in first-repeat order.
/// Empty for a well-formed tree.
pub fn repeated_ids(list: &[Arc<ComponentNode>]) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    collect_repeats(list, &mut seen, &mut repeated);
    repeated
}

fn collect_repeats(list: &[Arc<ComponentNode>], seen: &mut HashSet<NodeId>, repeated: &mut Vec<NodeId>) {
    for node in list {
        if seen.insert(node.id) {
            collect_repeats(node.children(), seen, repeated);
        } else if !repeated.contains(&node.id) {
            repeated.push(node.id);
        }
    }
}

pub fn collect_ids(list: &[Arc<ComponentNode>]) -> Vec<NodeId> {
    let mut ids = Vec::new();
    walk(list, &mut |node| ids.push(node.id));
    ids
}

pub fn count_nodes(list: &[Arc<ComponentNode>]) -> usize {
    let mut count = 0;
    walk(list, &mut |_| count += 1);
    count
}

// ─── Path editing ────────────────────────────────────────────────────────

/// Copy the path down to the list at `path`, hand that list to `edit`,
/// and rebuild the ancestors around the result.
///
/// Returns `None` if the path does not lead to a container.
pub(crate) fn edit_list<R>(
    list: &[Arc<ComponentNode>],
    path: &[usize],
    edit: impl FnOnce(&mut Vec<Arc<ComponentNode>>) -> R,
) -> Option<(Vec<Arc<ComponentNode>>, R)> {
    let mut out = list.to_vec();
    match path.split_first() {
        None => {
            let result = edit(&mut out);
            Some((out, result))
        }
        Some((&i, rest)) => {
            let node = list.get(i)?;
            if !node.is_container() {
                return None;
            }
            let (children, result) = edit_list(node.children(), rest, edit)?;
            out[i] = Arc::new(node.with_children(children));
            Some((out, result))
        }
    }
}

/// Replace the node at `loc` with `replacement`.
pub(crate) fn replace_at(
    list: &[Arc<ComponentNode>],
    loc: &Location,
    replacement: Arc<ComponentNode>,
) -> Option<Vec<Arc<ComponentNode>>> {
    let index = loc.index;
    edit_list(list, &loc.parent_path, move |siblings| {
        if let Some(slot) = siblings.get_mut(index) {
            *slot = replacement;
        }
    })
    .map(|(out, ())| out)
}

// ─── Public operations ───────────────────────────────────────────────────

/// Merge `patch` into the node matching `id`.
///
/// If `id` is not found the result shares every node with `list`.
pub fn update_by_id(
    list: &[Arc<ComponentNode>],
    id: NodeId,
    patch: &ComponentPatch,
) -> Vec<Arc<ComponentNode>> {
    let Some(loc) = locate(list, id) else {
        log::debug!("update: {id} not found");
        return list.to_vec();
    };
    let patched = Arc::new(loc.node.patched(patch));
    replace_at(list, &loc, patched).unwrap_or_else(|| list.to_vec())
}

/// Result of lifting a node out of the tree.
#[derive(Debug, Clone)]
pub struct Extracted {
    pub tree: Vec<Arc<ComponentNode>>,
    pub node: Arc<ComponentNode>,
    /// The container the node was taken from, `None` for top level.
    pub parent: Option<NodeId>,
}

/// Remove the node matching `id` without dissolving its old container.
pub fn extract(list: &[Arc<ComponentNode>], id: NodeId) -> Option<Extracted> {
    let loc = locate(list, id)?;
    let index = loc.index;
    let (tree, node) = edit_list(list, &loc.parent_path, move |siblings| {
        (index < siblings.len()).then(|| siblings.remove(index))
    })?;
    Some(Extracted {
        tree,
        node: node?,
        parent: loc.parent_id(),
    })
}

/// Remove the node matching `id` from wherever it is.
///
/// With `dissolve` set, a container left with one child is replaced by that
/// child and a container left empty is removed, cascading upwards.
pub fn remove_by_id(
    list: &[Arc<ComponentNode>],
    id: NodeId,
    dissolve: bool,
) -> Vec<Arc<ComponentNode>> {
    let Some(extracted) = extract(list, id) else {
        log::debug!("remove: {id} not found");
        return list.to_vec();
    };
    match (dissolve, extracted.parent) {
        (true, Some(parent)) => settle(&extracted.tree, parent),
        _ => extracted.tree,
    }
}

/// Dissolve `container` if it holds fewer than two children.
///
/// One child: the container is replaced by that child in its parent slot.
/// No children: the container is removed, and its own parent is checked
/// next since it just lost a child.
pub fn settle(list: &[Arc<ComponentNode>], container: NodeId) -> Vec<Arc<ComponentNode>> {
    let mut tree = list.to_vec();
    let mut next = Some(container);
    while let Some(id) = next.take() {
        let Some(loc) = locate(&tree, id) else {
            break;
        };
        if !loc.node.is_container() {
            break;
        }
        let replacement = match loc.node.children() {
            [] => None,
            [only] => Some(only.clone()),
            _ => break,
        };
        let emptied = replacement.is_none();
        let index = loc.index;
        let Some((edited, ())) = edit_list(&tree, &loc.parent_path, move |siblings| {
            match replacement {
                Some(child) => {
                    if let Some(slot) = siblings.get_mut(index) {
                        *slot = child;
                    }
                }
                None if index < siblings.len() => {
                    siblings.remove(index);
                }
                None => {}
            }
        }) else {
            break;
        };
        log::debug!(
            "dissolved {} {} ({})",
            loc.node.kind,
            id,
            if emptied { "empty" } else { "single child" }
        );
        tree = edited;
        if emptied {
            next = loc.parent_id();
        }
    }
    tree
}

/// Copy the subtree rooted at `id` with fresh ids and place the copy right
/// after the original, in the same list. Returns the new tree and the
/// copy's id, or `None` if `id` is not found.
pub fn duplicate_subtree(
    list: &[Arc<ComponentNode>],
    id: NodeId,
    factory: &mut ComponentFactory,
) -> Option<(Vec<Arc<ComponentNode>>, NodeId)> {
    let loc = locate(list, id)?;
    let copy = Arc::new(factory.duplicate(&loc.node));
    let copy_id = copy.id;
    let index = loc.index + 1;
    let (tree, ()) = edit_list(list, &loc.parent_path, move |siblings| {
        siblings.insert(index.min(siblings.len()), copy);
    })?;
    Some((tree, copy_id))
}

/// Insert `node` into the top-level list at `index`, clamped to `[0, len]`.
pub fn insert_at_index(
    list: &[Arc<ComponentNode>],
    index: usize,
    node: Arc<ComponentNode>,
) -> Vec<Arc<ComponentNode>> {
    let mut out = list.to_vec();
    out.insert(index.min(out.len()), node);
    out
}
