//! Integration tests: drag-drop engine scenarios.
//!
//! Each test builds a page through the public API and checks the shape of
//! the resulting component list.

use fb_core::dnd::{DropDescriptor, DropPosition, apply_drop};
use fb_core::model::{ComponentNode, ComponentType};
use fb_core::tree::{count_nodes, find, remove_by_id, settle};
use fb_core::{ComponentFactory, DragDropConfig, DropError, NodeId};
use pretty_assertions::assert_eq;
use std::sync::Arc;

type Page = Vec<Arc<ComponentNode>>;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Drop a new component and return the new page plus the placed id.
fn drop_new(
    page: &Page,
    factory: &mut ComponentFactory,
    kind: ComponentType,
    position: DropPosition,
    target: Option<NodeId>,
) -> (Page, NodeId) {
    let drop = DropDescriptor::new_component(kind, position, target);
    let outcome = apply_drop(page, &drop, factory, &DragDropConfig::default()).expect("drop failed");
    (outcome.components, outcome.placed)
}

fn drop_move(
    page: &Page,
    factory: &mut ComponentFactory,
    source: NodeId,
    position: DropPosition,
    target: Option<NodeId>,
    config: &DragDropConfig,
) -> Result<Page, DropError> {
    let drop = DropDescriptor::move_existing(source, position, target);
    apply_drop(page, &drop, factory, config).map(|o| o.components)
}

fn kinds(page: &[Arc<ComponentNode>]) -> Vec<ComponentType> {
    page.iter().map(|n| n.kind).collect()
}

fn ids(page: &[Arc<ComponentNode>]) -> Vec<NodeId> {
    page.iter().map(|n| n.id).collect()
}

/// A page of `n` text inputs built by canvas drops.
fn page_of(factory: &mut ComponentFactory, n: usize) -> (Page, Vec<NodeId>) {
    let mut page = Page::new();
    let mut placed = Vec::new();
    for _ in 0..n {
        let (next, id) = drop_new(&page, factory, ComponentType::TextInput, DropPosition::Center, None);
        page = next;
        placed.push(id);
    }
    (page, placed)
}

// ─── Canvas drops ───────────────────────────────────────────────────────

#[test]
fn center_drop_on_empty_page() {
    init();
    let mut factory = ComponentFactory::new();
    let (page, _) = drop_new(&Page::new(), &mut factory, ComponentType::TextInput, DropPosition::Center, None);
    assert_eq!(kinds(&page), vec![ComponentType::TextInput]);
}

#[test]
fn center_drop_appends() {
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 2);
    let (page, new_id) = drop_new(&page, &mut factory, ComponentType::Button, DropPosition::Center, Some(placed[0]));
    assert_eq!(ids(&page), vec![placed[0], placed[1], new_id]);
}

// ─── Before / after ─────────────────────────────────────────────────────

#[test]
fn before_and_after_splice_next_to_target() {
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 2);
    let (page, before) = drop_new(&page, &mut factory, ComponentType::Heading, DropPosition::Before, Some(placed[0]));
    let (page, after) = drop_new(&page, &mut factory, ComponentType::Checkbox, DropPosition::After, Some(placed[0]));
    assert_eq!(ids(&page), vec![before, placed[0], after, placed[1]]);
}

#[test]
fn missing_target_appends_instead_of_inserting() {
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 1);
    let drop = DropDescriptor::new_component(
        ComponentType::EmailInput,
        DropPosition::Before,
        Some(NodeId::intern("nonexistent")),
    );
    let outcome = apply_drop(&page, &drop, &mut factory, &DragDropConfig::default()).unwrap();
    assert!(outcome.fallback);
    assert_eq!(ids(&outcome.components), vec![placed[0], outcome.placed]);

    // Same drop again grows the page by exactly one more, at the end.
    let again = apply_drop(&outcome.components, &drop, &mut factory, &DragDropConfig::default()).unwrap();
    assert_eq!(again.components.len(), 3);
    assert_eq!(again.components.last().map(|n| n.id), Some(again.placed));
}

#[test]
fn before_inside_container_stays_in_container() {
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 1);
    let (page, right) = drop_new(&page, &mut factory, ComponentType::TextInput, DropPosition::Right, Some(placed[0]));
    let (page, inserted) = drop_new(&page, &mut factory, ComponentType::Checkbox, DropPosition::Before, Some(right));

    assert_eq!(page.len(), 1);
    assert_eq!(ids(page[0].children()), vec![placed[0], inserted, right]);
}

// ─── Left / right ───────────────────────────────────────────────────────

#[test]
fn left_of_bare_leaf_synthesizes_layout() {
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 1);
    let (page, email) = drop_new(&page, &mut factory, ComponentType::EmailInput, DropPosition::Left, Some(placed[0]));

    assert_eq!(kinds(&page), vec![ComponentType::HorizontalLayout]);
    assert_eq!(ids(page[0].children()), vec![email, placed[0]]);
    assert_eq!(page[0].children()[0].kind, ComponentType::EmailInput);
}

#[test]
fn right_of_bare_leaf_keeps_slot_position() {
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 3);
    let (page, new_id) = drop_new(&page, &mut factory, ComponentType::DatePicker, DropPosition::Right, Some(placed[1]));

    assert_eq!(page.len(), 3);
    assert_eq!(page[0].id, placed[0]);
    assert_eq!(page[1].kind, ComponentType::HorizontalLayout);
    assert_eq!(ids(page[1].children()), vec![placed[1], new_id]);
    assert_eq!(page[2].id, placed[2]);
}

#[test]
fn left_right_extend_existing_layout() {
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 1);
    let (page, b) = drop_new(&page, &mut factory, ComponentType::TextInput, DropPosition::Right, Some(placed[0]));
    let layout_id = page[0].id;
    let (page, c) = drop_new(&page, &mut factory, ComponentType::TextInput, DropPosition::Left, Some(b));

    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, layout_id, "no new container should be created");
    assert_eq!(ids(page[0].children()), vec![placed[0], c, b]);
}

#[test]
fn full_layout_rejects_more_children() {
    let mut factory = ComponentFactory::new();
    let (mut page, placed) = page_of(&mut factory, 1);
    let mut last = placed[0];
    for _ in 0..3 {
        let (next, id) = drop_new(&page, &mut factory, ComponentType::TextInput, DropPosition::Right, Some(last));
        page = next;
        last = id;
    }
    assert_eq!(page[0].child_count(), 4);
    let layout_id = page[0].id;

    for position in [DropPosition::Right, DropPosition::Before] {
        let drop = DropDescriptor::new_component(ComponentType::TextInput, position, Some(last));
        assert_eq!(
            apply_drop(&page, &drop, &mut factory, &DragDropConfig::default()).map(|o| o.components.len()),
            Err(DropError::CapacityExceeded {
                layout: layout_id,
                capacity: 4
            })
        );
    }

    let inside = DropDescriptor::new_component(ComponentType::TextInput, DropPosition::Inside, Some(layout_id));
    assert!(matches!(
        apply_drop(&page, &inside, &mut factory, &DragDropConfig::default()),
        Err(DropError::CapacityExceeded { .. })
    ));
}

#[test]
fn left_right_degrade_when_horizontal_disabled() {
    let config = DragDropConfig {
        enable_horizontal_layouts: false,
        ..Default::default()
    };
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 1);
    let drop = DropDescriptor::new_component(ComponentType::EmailInput, DropPosition::Left, Some(placed[0]));
    let outcome = apply_drop(&page, &drop, &mut factory, &config).unwrap();
    assert_eq!(ids(&outcome.components), vec![outcome.placed, placed[0]]);
    assert!(outcome.components.iter().all(|n| !n.is_container()));
}

// ─── Inside ─────────────────────────────────────────────────────────────

#[test]
fn inside_appends_to_container() {
    let mut factory = ComponentFactory::new();
    let (page, column) = drop_new(&Page::new(), &mut factory, ComponentType::VerticalLayout, DropPosition::Center, None);
    let (page, a) = drop_new(&page, &mut factory, ComponentType::TextInput, DropPosition::Inside, Some(column));
    let (page, b) = drop_new(&page, &mut factory, ComponentType::Textarea, DropPosition::Inside, Some(column));
    assert_eq!(page.len(), 1);
    assert_eq!(ids(page[0].children()), vec![a, b]);
}

#[test]
fn inside_a_leaf_is_rejected() {
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 1);
    let drop = DropDescriptor::new_component(ComponentType::TextInput, DropPosition::Inside, Some(placed[0]));
    assert_eq!(
        apply_drop(&page, &drop, &mut factory, &DragDropConfig::default()).map(|o| o.components.len()),
        Err(DropError::NotAContainer {
            id: placed[0],
            kind: ComponentType::TextInput
        })
    );
}

#[test]
fn palette_layout_fills_then_dissolves_when_emptied_out() {
    let mut factory = ComponentFactory::new();
    let (page, row) = drop_new(&Page::new(), &mut factory, ComponentType::HorizontalLayout, DropPosition::Center, None);
    let (page, first) = drop_new(&page, &mut factory, ComponentType::TextInput, DropPosition::Inside, Some(row));
    assert_eq!(page[0].child_count(), 1);

    let (page, second) = drop_new(&page, &mut factory, ComponentType::Checkbox, DropPosition::Inside, Some(row));
    assert_eq!(ids(page[0].children()), vec![first, second]);

    let page = drop_move(&page, &mut factory, second, DropPosition::After, Some(row), &DragDropConfig::default()).unwrap();
    assert_eq!(ids(&page), vec![first, second]);
}

// ─── Moves ──────────────────────────────────────────────────────────────

#[test]
fn moving_out_of_layout_dissolves_it() {
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 1);
    let a = placed[0];
    let (page, b) = drop_new(&page, &mut factory, ComponentType::TextInput, DropPosition::Right, Some(a));
    let layout_id = page[0].id;

    let page = drop_move(&page, &mut factory, b, DropPosition::After, Some(layout_id), &DragDropConfig::default()).unwrap();
    assert_eq!(ids(&page), vec![a, b]);
    assert!(page.iter().all(|n| !n.is_container()));
}

#[test]
fn moving_out_of_layout_keeps_following_siblings_in_order() {
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 2);
    let (page, b) = drop_new(&page, &mut factory, ComponentType::TextInput, DropPosition::Right, Some(placed[0]));
    let layout_id = page[0].id;

    let page = drop_move(&page, &mut factory, b, DropPosition::After, Some(layout_id), &DragDropConfig::default()).unwrap();
    assert_eq!(ids(&page), vec![placed[0], b, placed[1]]);
}

#[test]
fn reorder_within_layout() {
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 1);
    let a = placed[0];
    let (page, b) = drop_new(&page, &mut factory, ComponentType::TextInput, DropPosition::Right, Some(a));
    let layout_id = page[0].id;

    let page = drop_move(&page, &mut factory, b, DropPosition::Left, Some(a), &DragDropConfig::default()).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, layout_id);
    assert_eq!(ids(page[0].children()), vec![b, a]);
}

#[test]
fn move_into_full_layout_from_outside_is_rejected() {
    let mut factory = ComponentFactory::new();
    let (mut page, placed) = page_of(&mut factory, 2);
    let mut last = placed[0];
    for _ in 0..3 {
        let (next, id) = drop_new(&page, &mut factory, ComponentType::TextInput, DropPosition::Right, Some(last));
        page = next;
        last = id;
    }
    let result = drop_move(&page, &mut factory, placed[1], DropPosition::Right, Some(last), &DragDropConfig::default());
    assert!(matches!(result, Err(DropError::CapacityExceeded { .. })));
}

#[test]
fn move_of_unknown_source_is_rejected() {
    let mut factory = ComponentFactory::new();
    let (page, _) = page_of(&mut factory, 1);
    let ghost = NodeId::intern("ghost_component");
    assert_eq!(
        drop_move(&page, &mut factory, ghost, DropPosition::Center, None, &DragDropConfig::default()),
        Err(DropError::SourceComponentNotFound(ghost))
    );
}

#[test]
fn move_into_own_subtree_is_rejected() {
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 1);
    let (page, b) = drop_new(&page, &mut factory, ComponentType::TextInput, DropPosition::Right, Some(placed[0]));
    let layout_id = page[0].id;
    assert_eq!(
        drop_move(&page, &mut factory, layout_id, DropPosition::After, Some(b), &DragDropConfig::default()),
        Err(DropError::TargetInsideSource {
            source_id: layout_id,
            target: b
        })
    );
}

#[test]
fn cross_layout_moves_can_be_disabled() {
    let config = DragDropConfig {
        enable_cross_layout_movement: false,
        ..Default::default()
    };
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 2);
    let (page, b) = drop_new(&page, &mut factory, ComponentType::TextInput, DropPosition::Right, Some(placed[0]));

    // Out of the layout: rejected.
    assert_eq!(
        drop_move(&page, &mut factory, b, DropPosition::After, Some(placed[1]), &config),
        Err(DropError::CrossLayoutMoveDisabled(b))
    );
    // Within the layout: allowed.
    let page = drop_move(&page, &mut factory, b, DropPosition::Before, Some(placed[0]), &config).unwrap();
    assert_eq!(ids(page[0].children()), vec![b, placed[0]]);
    // Top level to top level: allowed.
    let page = drop_move(&page, &mut factory, placed[1], DropPosition::Before, Some(page[0].id), &config).unwrap();
    assert_eq!(page[0].id, placed[1]);
}

#[test]
fn vertical_reordering_can_be_disabled() {
    let config = DragDropConfig {
        enable_vertical_reordering: false,
        ..Default::default()
    };
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 2);
    assert_eq!(
        drop_move(&page, &mut factory, placed[1], DropPosition::Before, Some(placed[0]), &config),
        Err(DropError::PositionDisabled("before"))
    );
}

#[test]
fn drops_never_mutate_their_input() {
    let mut factory = ComponentFactory::new();
    let (page, placed) = page_of(&mut factory, 2);
    let (page, b) = drop_new(&page, &mut factory, ComponentType::TextInput, DropPosition::Right, Some(placed[0]));
    let snapshot: Vec<ComponentNode> = page.iter().map(|n| (**n).clone()).collect();

    let _ = drop_move(&page, &mut factory, b, DropPosition::After, Some(placed[1]), &DragDropConfig::default()).unwrap();
    let _ = drop_new(&page, &mut factory, ComponentType::Select, DropPosition::Left, Some(placed[0]));

    let after: Vec<ComponentNode> = page.iter().map(|n| (**n).clone()).collect();
    assert_eq!(snapshot, after);
}

#[test]
fn closure_factory_is_accepted() {
    let mut counter = 0;
    let mut factory = |kind: ComponentType| {
        counter += 1;
        let mut node = ComponentNode::new(NodeId::intern(&format!("cf_{counter}")), kind);
        node.label = "Field".into();
        node
    };
    let drop = DropDescriptor::new_component(ComponentType::TextInput, DropPosition::Center, None);
    let outcome = apply_drop(&[], &drop, &mut factory, &DragDropConfig::default()).unwrap();
    assert_eq!(outcome.placed, NodeId::intern("cf_1"));
}

// ─── Corrupted input ────────────────────────────────────────────────────

fn node(id: &str, kind: ComponentType) -> Arc<ComponentNode> {
    Arc::new(ComponentNode::new(NodeId::intern(id), kind))
}

fn container(id: &str, kind: ComponentType, children: Vec<Arc<ComponentNode>>) -> Arc<ComponentNode> {
    Arc::new(ComponentNode::new(NodeId::intern(id), kind).with_children(children))
}

/// `cy_row[cy_a, cy_col[cy_row[cy_x, cy_y], cy_b]], cy_d`: the row id
/// reappears below itself, so `cy_x` and `cy_y` are unreachable.
fn cyclic_page() -> Page {
    let inner = container(
        "cy_row",
        ComponentType::HorizontalLayout,
        vec![node("cy_x", ComponentType::TextInput), node("cy_y", ComponentType::TextInput)],
    );
    let col = container(
        "cy_col",
        ComponentType::VerticalLayout,
        vec![inner, node("cy_b", ComponentType::Checkbox)],
    );
    vec![
        container(
            "cy_row",
            ComponentType::HorizontalLayout,
            vec![node("cy_a", ComponentType::TextInput), col],
        ),
        node("cy_d", ComponentType::Button),
    ]
}

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

#[test]
fn drops_on_cyclic_input_skip_the_repeated_branch() {
    init();
    let mut factory = ComponentFactory::new();
    let page = cyclic_page();
    assert_eq!(count_nodes(&page), 5);

    for (position, target) in [
        (DropPosition::Before, "cy_b"),
        (DropPosition::After, "cy_d"),
        (DropPosition::Left, "cy_a"),
        (DropPosition::Inside, "cy_col"),
    ] {
        let drop = DropDescriptor::new_component(ComponentType::Checkbox, position, Some(id(target)));
        let outcome = apply_drop(&page, &drop, &mut factory, &DragDropConfig::default()).unwrap();

        assert!(!outcome.fallback, "{position} {target}");
        assert_eq!(outcome.diagnostics, vec![DropError::CircularStructure(id("cy_row"))]);
        assert!(find(&outcome.components, outcome.placed).is_some());
        assert_eq!(count_nodes(&outcome.components), 6);
        for survivor in ["cy_row", "cy_a", "cy_col", "cy_b", "cy_d"] {
            assert!(find(&outcome.components, id(survivor)).is_some(), "{survivor} lost");
        }
    }
}

#[test]
fn unreachable_target_in_cyclic_input_falls_back_to_append() {
    let mut factory = ComponentFactory::new();
    let page = cyclic_page();
    let drop = DropDescriptor::new_component(ComponentType::Checkbox, DropPosition::Before, Some(id("cy_x")));
    let outcome = apply_drop(&page, &drop, &mut factory, &DragDropConfig::default()).unwrap();

    assert!(outcome.fallback);
    assert_eq!(ids(&outcome.components), vec![id("cy_row"), id("cy_d"), outcome.placed]);
}

#[test]
fn move_out_of_cyclic_input_settles_old_container() {
    let mut factory = ComponentFactory::new();
    let page = cyclic_page();
    let page = drop_move(&page, &mut factory, id("cy_b"), DropPosition::After, Some(id("cy_d")), &DragDropConfig::default())
        .unwrap();

    // cy_col dissolved into its only child, the repeated row.
    assert_eq!(ids(&page), vec![id("cy_row"), id("cy_d"), id("cy_b")]);
    assert_eq!(ids(page[0].children()), vec![id("cy_a"), id("cy_row")]);
    assert_eq!(count_nodes(&page), 4);
}

#[test]
fn remove_and_settle_on_cyclic_input() {
    let page = cyclic_page();
    assert_eq!(settle(&page, id("cy_col")), page);

    // Removing cy_a dissolves the outer row; the inner row becomes reachable.
    let page = remove_by_id(&page, id("cy_a"), true);
    assert_eq!(ids(&page), vec![id("cy_col"), id("cy_d")]);
    assert_eq!(count_nodes(&page), 6);
    assert!(find(&page, id("cy_x")).is_some());
}
