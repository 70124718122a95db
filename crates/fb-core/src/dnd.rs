//! Drag-drop transformation engine.
//!
//! Takes a page's top-level component list and a resolved drop descriptor
//! and computes the new list. The input is never modified: on `Err` the
//! caller keeps what it had, on `Ok` it swaps in the returned list.
//!
//! Moves are extract-then-insert. The node is lifted out of its container
//! first, placed relative to the target, and only then is the old container
//! settled (dissolved if it shrank below two children). Settling last keeps
//! the target addressable when the target is the old container itself.
//!
//! A layout dropped from the palette starts empty and fills through `inside`
//! drops. Dissolution only applies to a container that loses a child, so such
//! a layout may hold fewer than two children until one is taken out of it.

use crate::config::DragDropConfig;
use crate::error::DropError;
use crate::factory::ComponentFactory;
use crate::id::NodeId;
use crate::model::{ComponentNode, ComponentType};
use crate::tree::{Location, edit_list, extract, is_within, locate, repeated_ids, replace_at, settle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ─── Descriptors ─────────────────────────────────────────────────────────

/// Where the dropped node lands relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Before,
    After,
    Left,
    Right,
    Inside,
    /// Canvas-level drop: append to the end of the page.
    Center,
}

impl DropPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            DropPosition::Before => "before",
            DropPosition::After => "after",
            DropPosition::Left => "left",
            DropPosition::Right => "right",
            DropPosition::Inside => "inside",
            DropPosition::Center => "center",
        }
    }
}

impl fmt::Display for DropPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DropPosition {
    type Err = DropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(DropPosition::Before),
            "after" => Ok(DropPosition::After),
            "left" => Ok(DropPosition::Left),
            "right" => Ok(DropPosition::Right),
            "inside" => Ok(DropPosition::Inside),
            "center" => Ok(DropPosition::Center),
            other => Err(DropError::UnknownDropPosition(other.to_string())),
        }
    }
}

/// What is being dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropPayload {
    /// A brand-new component from the palette.
    New(ComponentType),
    /// An already placed component being moved.
    Existing(NodeId),
}

/// A resolved drop gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropDescriptor {
    pub position: DropPosition,
    /// `None` for the empty canvas.
    pub target: Option<NodeId>,
    pub payload: DropPayload,
}

impl DropDescriptor {
    pub fn new_component(kind: ComponentType, position: DropPosition, target: Option<NodeId>) -> Self {
        Self {
            position,
            target,
            payload: DropPayload::New(kind),
        }
    }

    pub fn move_existing(source: NodeId, position: DropPosition, target: Option<NodeId>) -> Self {
        Self {
            position,
            target,
            payload: DropPayload::Existing(source),
        }
    }
}

/// The drop descriptor as the UI shell sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDropDescriptor {
    pub position_kind: String,
    /// Empty string means the empty canvas.
    #[serde(default)]
    pub target_id: String,
    #[serde(default)]
    pub component_type: Option<String>,
    #[serde(default)]
    pub existing_source_id: Option<String>,
}

impl TryFrom<RawDropDescriptor> for DropDescriptor {
    type Error = DropError;

    fn try_from(raw: RawDropDescriptor) -> Result<Self, Self::Error> {
        let position = raw.position_kind.parse::<DropPosition>()?;
        let target = (!raw.target_id.is_empty()).then(|| NodeId::intern(&raw.target_id));
        let payload = match (raw.existing_source_id.as_deref(), raw.component_type.as_deref()) {
            (Some(source), _) if !source.is_empty() => DropPayload::Existing(NodeId::intern(source)),
            (_, Some(tag)) => DropPayload::New(tag.parse::<ComponentType>()?),
            _ => return Err(DropError::MissingPayload),
        };
        Ok(Self {
            position,
            target,
            payload,
        })
    }
}

// ─── Node factory seam ───────────────────────────────────────────────────

/// Source of new nodes: palette drops and synthesized layouts.
pub trait NodeFactory {
    fn create_node(&mut self, kind: ComponentType) -> ComponentNode;
}

impl NodeFactory for ComponentFactory {
    fn create_node(&mut self, kind: ComponentType) -> ComponentNode {
        self.create(kind)
    }
}

impl<F> NodeFactory for F
where
    F: FnMut(ComponentType) -> ComponentNode,
{
    fn create_node(&mut self, kind: ComponentType) -> ComponentNode {
        self(kind)
    }
}

// ─── Engine ──────────────────────────────────────────────────────────────

/// A committed drop.
#[derive(Debug, Clone)]
pub struct DropOutcome {
    pub components: Vec<Arc<ComponentNode>>,
    /// Id of the node that was placed (new or moved).
    pub placed: NodeId,
    /// The target could not be found and the node was appended at the end.
    pub fallback: bool,
    /// `CircularStructure` for every id the input tree reaches more than
    /// once. Those branches were skipped; the rest of the drop applied.
    pub diagnostics: Vec<DropError>,
}

/// Apply `drop` to `components`.
///
/// # Errors
/// Any `DropError` means nothing was applied; `components` stays valid.
pub fn apply_drop(
    components: &[Arc<ComponentNode>],
    drop: &DropDescriptor,
    factory: &mut dyn NodeFactory,
    config: &DragDropConfig,
) -> Result<DropOutcome, DropError> {
    let position = effective_position(drop.position, config)?;
    let mut outcome = match drop.payload {
        DropPayload::New(kind) => {
            let node = Arc::new(factory.create_node(kind));
            let placed = node.id;
            let (components, fallback) = place(components, node, position, drop.target, factory, config)?;
            DropOutcome {
                components,
                placed,
                fallback,
                diagnostics: Vec::new(),
            }
        }
        DropPayload::Existing(source) => {
            move_existing(components, source, position, drop.target, factory, config)?
        }
    };
    outcome.diagnostics = repeated_ids(components)
        .into_iter()
        .map(DropError::CircularStructure)
        .collect();
    log::debug!(
        "drop {} {:?} -> {} top-level nodes{}",
        position,
        drop.target,
        outcome.components.len(),
        if outcome.fallback { " (appended)" } else { "" }
    );
    Ok(outcome)
}

/// Map `left`/`right` onto `before`/`after` when horizontal layouts are off,
/// and reject positions switched off by configuration.
fn effective_position(position: DropPosition, config: &DragDropConfig) -> Result<DropPosition, DropError> {
    let position = match position {
        DropPosition::Left if !config.enable_horizontal_layouts => DropPosition::Before,
        DropPosition::Right if !config.enable_horizontal_layouts => DropPosition::After,
        other => other,
    };
    if matches!(position, DropPosition::Before | DropPosition::After)
        && !config.enable_vertical_reordering
    {
        return Err(DropError::PositionDisabled(position.as_str()));
    }
    Ok(position)
}

fn move_existing(
    components: &[Arc<ComponentNode>],
    source: NodeId,
    position: DropPosition,
    target: Option<NodeId>,
    factory: &mut dyn NodeFactory,
    config: &DragDropConfig,
) -> Result<DropOutcome, DropError> {
    let source_loc = locate(components, source).ok_or(DropError::SourceComponentNotFound(source))?;

    if position != DropPosition::Center
        && let Some(target) = target
        && is_within(components, source, target)
    {
        return Err(DropError::TargetInsideSource {
            source_id: source,
            target,
        });
    }

    if !config.enable_cross_layout_movement {
        let from = Destination::of(source_loc.parent_id());
        let to = destination(components, position, target);
        if from != to {
            return Err(DropError::CrossLayoutMoveDisabled(source));
        }
    }

    let extracted = extract(components, source).ok_or(DropError::SourceComponentNotFound(source))?;
    let (mut tree, fallback) = place(&extracted.tree, extracted.node, position, target, factory, config)?;
    if config.auto_dissolve_empty_layouts
        && let Some(old_parent) = extracted.parent
    {
        tree = settle(&tree, old_parent);
    }
    Ok(DropOutcome {
        components: tree,
        placed: source,
        fallback,
        diagnostics: Vec::new(),
    })
}

/// The container a drop would put a node into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    TopLevel,
    Container(NodeId),
    /// A horizontal layout synthesized by the drop itself.
    NewLayout,
}

impl Destination {
    fn of(parent: Option<NodeId>) -> Self {
        parent.map_or(Destination::TopLevel, Destination::Container)
    }
}

fn destination(
    components: &[Arc<ComponentNode>],
    position: DropPosition,
    target: Option<NodeId>,
) -> Destination {
    let Some(loc) = target.and_then(|t| locate(components, t)) else {
        return Destination::TopLevel;
    };
    match position {
        DropPosition::Center => Destination::TopLevel,
        DropPosition::Before | DropPosition::After => Destination::of(loc.parent_id()),
        DropPosition::Left | DropPosition::Right if loc.in_horizontal_layout() => {
            Destination::of(loc.parent_id())
        }
        DropPosition::Left | DropPosition::Right => Destination::NewLayout,
        DropPosition::Inside => Destination::Container(loc.node.id),
    }
}

/// Put `node` into `tree` relative to `target`. Returns the new tree and
/// whether the append-at-end fallback was used.
fn place(
    tree: &[Arc<ComponentNode>],
    node: Arc<ComponentNode>,
    position: DropPosition,
    target: Option<NodeId>,
    factory: &mut dyn NodeFactory,
    config: &DragDropConfig,
) -> Result<(Vec<Arc<ComponentNode>>, bool), DropError> {
    if position == DropPosition::Center {
        return Ok((append(tree, node), false));
    }

    let Some(loc) = target.and_then(|t| locate(tree, t)) else {
        if let Some(missing) = target {
            log::warn!("drop target {missing} not found, appending at end");
        }
        return Ok((append(tree, node), target.is_some()));
    };

    let placed = match position {
        DropPosition::Before => insert_beside(tree, &loc, node, false, config)?,
        DropPosition::After => insert_beside(tree, &loc, node, true, config)?,
        DropPosition::Left => insert_horizontal(tree, &loc, node, true, factory, config)?,
        DropPosition::Right => insert_horizontal(tree, &loc, node, false, factory, config)?,
        DropPosition::Inside => insert_inside(tree, &loc, node, config)?,
        DropPosition::Center => append(tree, node),
    };
    Ok((placed, false))
}

fn append(tree: &[Arc<ComponentNode>], node: Arc<ComponentNode>) -> Vec<Arc<ComponentNode>> {
    let mut out = tree.to_vec();
    out.push(node);
    out
}

fn check_capacity(layout: NodeId, child_count: usize, config: &DragDropConfig) -> Result<(), DropError> {
    if child_count >= config.max_horizontal_children {
        log::warn!("layout {layout} is full ({child_count} children)");
        return Err(DropError::CapacityExceeded {
            layout,
            capacity: config.max_horizontal_children,
        });
    }
    Ok(())
}

/// Splice next to the target in whatever list holds it.
fn insert_beside(
    tree: &[Arc<ComponentNode>],
    loc: &Location,
    node: Arc<ComponentNode>,
    after: bool,
    config: &DragDropConfig,
) -> Result<Vec<Arc<ComponentNode>>, DropError> {
    if let Some(parent) = loc.parent
        && parent.kind == ComponentType::HorizontalLayout
    {
        check_capacity(parent.id, parent.child_count, config)?;
    }
    let index = if after { loc.index + 1 } else { loc.index };
    edit_list(tree, &loc.parent_path, move |siblings| {
        siblings.insert(index.min(siblings.len()), node);
    })
    .map(|(out, ())| out)
    .ok_or(DropError::TargetNotFound(loc.node.id))
}

/// Extend the target's horizontal layout, or wrap the target in a new one.
fn insert_horizontal(
    tree: &[Arc<ComponentNode>],
    loc: &Location,
    node: Arc<ComponentNode>,
    left: bool,
    factory: &mut dyn NodeFactory,
    config: &DragDropConfig,
) -> Result<Vec<Arc<ComponentNode>>, DropError> {
    if let Some(parent) = loc.parent
        && parent.kind == ComponentType::HorizontalLayout
    {
        check_capacity(parent.id, parent.child_count, config)?;
        let index = if left { loc.index } else { loc.index + 1 };
        return edit_list(tree, &loc.parent_path, move |siblings| {
            siblings.insert(index.min(siblings.len()), node);
        })
        .map(|(out, ())| out)
        .ok_or(DropError::TargetNotFound(loc.node.id));
    }

    let mut layout = factory.create_node(ComponentType::HorizontalLayout);
    layout.kind = ComponentType::HorizontalLayout;
    check_capacity(layout.id, 1, config)?;
    let children = if left {
        vec![node, loc.node.clone()]
    } else {
        vec![loc.node.clone(), node]
    };
    log::debug!("wrapping {} in new layout {}", loc.node.id, layout.id);
    let layout = Arc::new(layout.with_children(children));
    replace_at(tree, loc, layout).ok_or(DropError::TargetNotFound(loc.node.id))
}

/// Append to the target container's children.
fn insert_inside(
    tree: &[Arc<ComponentNode>],
    loc: &Location,
    node: Arc<ComponentNode>,
    config: &DragDropConfig,
) -> Result<Vec<Arc<ComponentNode>>, DropError> {
    let container = &loc.node;
    if !container.is_container() {
        return Err(DropError::NotAContainer {
            id: container.id,
            kind: container.kind,
        });
    }
    if container.kind == ComponentType::HorizontalLayout {
        check_capacity(container.id, container.child_count(), config)?;
    }
    edit_list(tree, &loc.path(), move |children| children.push(node))
        .map(|(out, ())| out)
        .ok_or(DropError::TargetNotFound(container.id))
}
