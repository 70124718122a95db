//! Form state and the action reducer.
//!
//! `execute_action` is pure over `FormState`: it reads the current state and
//! returns the next one. Tree surgery is delegated to `fb_core::tree` and
//! `fb_core::dnd`; this module only routes actions to the current page and
//! keeps page and selection bookkeeping consistent.

use crate::actions::FormAction;
use crate::error::EditorError;
use fb_core::dnd::apply_drop;
use fb_core::tree::{contains, duplicate_subtree, parent_container, remove_by_id, update_by_id};
use fb_core::{ComponentFactory, ComponentNode, ComponentType, DragDropConfig, DropDescriptor, DropError, FormPage, NodeId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The editing session's document plus selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    /// Never empty.
    pub pages: Vec<FormPage>,
    pub current_page_id: NodeId,
    /// Selection only; not part of the exported form.
    pub selected_component_id: Option<NodeId>,
}

impl FormState {
    /// One empty page titled "Page 1".
    pub fn new(page_id: NodeId) -> Self {
        Self {
            pages: vec![FormPage::new(page_id, "Page 1")],
            current_page_id: page_id,
            selected_component_id: None,
        }
    }

    /// State over existing pages, with the first page current.
    /// `None` if `pages` is empty.
    pub fn with_pages(pages: Vec<FormPage>) -> Option<Self> {
        let current_page_id = pages.first()?.id;
        Some(Self {
            pages,
            current_page_id,
            selected_component_id: None,
        })
    }

    pub fn page(&self, id: NodeId) -> Option<&FormPage> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// # Errors
    /// `PageNotFound` if `current_page_id` points nowhere.
    pub fn current_page(&self) -> Result<&FormPage, EditorError> {
        self.page(self.current_page_id)
            .ok_or(EditorError::PageNotFound(self.current_page_id))
    }

    /// Top-level components of the current page (empty if it is missing).
    pub fn current_components(&self) -> &[Arc<ComponentNode>] {
        self.current_page()
            .map(|p| p.components.as_slice())
            .unwrap_or(&[])
    }

    /// Copy of this state with the current page's list replaced.
    fn with_components(&self, components: Vec<Arc<ComponentNode>>) -> Self {
        let mut next = self.clone();
        if let Some(page) = next.pages.iter_mut().find(|p| p.id == self.current_page_id) {
            page.components = components;
        }
        next
    }
}

/// What the reducer needs besides the state: a factory for new nodes and
/// the drag-drop switches.
pub struct ActionContext<'a> {
    pub factory: &'a mut ComponentFactory,
    pub config: &'a DragDropConfig,
}

/// Apply one action.
///
/// The selection of the returned state always resolves on its current page:
/// a selected node that was removed, or dissolved away with its layout, is
/// deselected.
///
/// # Errors
/// Any `EditorError`; `state` is never modified, so an error simply means
/// the action did not apply.
pub fn execute_action(
    state: &FormState,
    action: &FormAction,
    ctx: &mut ActionContext<'_>,
) -> Result<FormState, EditorError> {
    apply(state, action, ctx).map(prune_selection)
}

fn prune_selection(mut next: FormState) -> FormState {
    if let Some(selected) = next.selected_component_id
        && !contains(next.current_components(), selected)
    {
        log::debug!("selection {selected} no longer exists, clearing");
        next.selected_component_id = None;
    }
    next
}

fn apply(
    state: &FormState,
    action: &FormAction,
    ctx: &mut ActionContext<'_>,
) -> Result<FormState, EditorError> {
    let page = state.current_page()?;
    let components = page.components.as_slice();

    match action {
        FormAction::AddComponent {
            component_type,
            index,
        } => {
            let node = Arc::new(ctx.factory.create_from_tag(component_type)?);
            let mut list = components.to_vec();
            match index {
                Some(i) => list.insert((*i).min(list.len()), node),
                None => list.push(node),
            }
            Ok(state.with_components(list))
        }

        FormAction::UpdateComponent { id, patch } => {
            require_component(components, *id)?;
            Ok(state.with_components(update_by_id(components, *id, patch)))
        }

        FormAction::DeleteComponent { id } => {
            require_component(components, *id)?;
            let list = remove_by_id(components, *id, ctx.config.auto_dissolve_empty_layouts);
            Ok(state.with_components(list))
        }

        FormAction::MoveComponent { from, to } => {
            let len = components.len();
            if *from >= len {
                return Err(EditorError::IndexOutOfRange { index: *from, len });
            }
            let mut list = components.to_vec();
            let node = list.remove(*from);
            list.insert((*to).min(list.len()), node);
            Ok(state.with_components(list))
        }

        FormAction::DropComponent { drop } => {
            let descriptor = DropDescriptor::try_from(drop.clone())?;
            let outcome = apply_drop(components, &descriptor, &mut *ctx.factory, ctx.config)?;
            Ok(state.with_components(outcome.components))
        }

        FormAction::DuplicateComponent { id } => {
            if let Some(parent) = parent_container(components, *id)
                && parent.kind == ComponentType::HorizontalLayout
                && parent.child_count() >= ctx.config.max_horizontal_children
            {
                return Err(DropError::CapacityExceeded {
                    layout: parent.id,
                    capacity: ctx.config.max_horizontal_children,
                }
                .into());
            }
            let (list, copy) = duplicate_subtree(components, *id, &mut *ctx.factory)
                .ok_or(EditorError::ComponentNotFound(*id))?;
            let mut next = state.with_components(list);
            next.selected_component_id = Some(copy);
            Ok(next)
        }

        FormAction::SelectComponent { id } => {
            if let Some(id) = id {
                require_component(components, *id)?;
            }
            let mut next = state.clone();
            next.selected_component_id = *id;
            Ok(next)
        }

        FormAction::AddPage { title } => {
            let title = match title {
                Some(t) if t.trim().is_empty() => return Err(EditorError::InvalidPageTitle),
                Some(t) => t.clone(),
                None => format!("Page {}", state.pages.len() + 1),
            };
            let id = ctx.factory.next_id("page");
            let mut next = state.clone();
            next.pages.push(FormPage::new(id, title));
            next.current_page_id = id;
            next.selected_component_id = None;
            Ok(next)
        }

        FormAction::DeletePage { id } => {
            let index = page_index(state, *id)?;
            if state.pages.len() == 1 {
                return Err(EditorError::LastPageDeletion);
            }
            let mut next = state.clone();
            next.pages.remove(index);
            if state.current_page_id == *id
                && let Some(first) = next.pages.first()
            {
                next.current_page_id = first.id;
                next.selected_component_id = None;
            }
            Ok(next)
        }

        FormAction::RenamePage { id, title } => {
            if title.trim().is_empty() {
                return Err(EditorError::InvalidPageTitle);
            }
            let index = page_index(state, *id)?;
            let mut next = state.clone();
            next.pages[index].title = title.clone();
            Ok(next)
        }

        FormAction::SwitchPage { id } => {
            page_index(state, *id)?;
            let mut next = state.clone();
            next.current_page_id = *id;
            next.selected_component_id = None;
            Ok(next)
        }
    }
}

fn require_component(components: &[Arc<ComponentNode>], id: NodeId) -> Result<(), EditorError> {
    if contains(components, id) {
        Ok(())
    } else {
        Err(EditorError::ComponentNotFound(id))
    }
}

fn page_index(state: &FormState, id: NodeId) -> Result<usize, EditorError> {
    state
        .pages
        .iter()
        .position(|p| p.id == id)
        .ok_or(EditorError::PageNotFound(id))
}
