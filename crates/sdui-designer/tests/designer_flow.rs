//! Integration tests: full designer gestures — palette drops, node drags,
//! clipboard flows, and keyboard commands — through the public controller API.

use sdui_core::{NodeId, parse_document};
use sdui_designer::catalog::{ComponentTemplate, StaticCatalog};
use sdui_designer::controller::{Designer, PasteFallback};
use sdui_designer::shortcuts::Modifiers;
use serde_json::{Map, json};

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

const CMD: Modifiers = Modifiers {
    meta: true,
    ctrl: false,
    shift: false,
    alt: false,
};

fn catalog() -> StaticCatalog {
    let mut catalog = StaticCatalog::new();
    let mut props = Map::new();
    props.insert("text".into(), json!("New text"));
    catalog.define(
        "text",
        ComponentTemplate {
            default_props: props,
            default_children: Vec::new(),
        },
    );
    catalog
}

fn make_designer() -> Designer<StaticCatalog> {
    let doc = r#"{ "id": "root", "type": "page",
                   "children": [ { "id": "child-1", "type": "card",
                                   "children": [ { "id": "nested", "type": "text" } ] },
                                 { "id": "child-2", "type": "card" },
                                 { "id": "child-3", "type": "card" } ] }"#;
    Designer::new(parse_document(doc).unwrap(), catalog())
}

// ─── Drag and drop ──────────────────────────────────────────────────────

#[test]
fn palette_drop_inserts_from_template() {
    let mut designer = make_designer();

    designer.start_palette_drag("text");
    assert_eq!(designer.dragging_palette(), Some("text"));
    designer.drag_hover(id("child-2"), 0.8);
    assert!(designer.complete_drop());

    let child = designer.tree().find(id("child-2")).unwrap();
    assert_eq!(child.children.len(), 1);
    assert_eq!(child.children[0].kind, "text");
    assert_eq!(child.children[0].props["text"], json!("New text"));
}

#[test]
fn node_drop_on_upper_half_prepends() {
    let mut designer = make_designer();

    assert!(designer.start_node_drag(id("child-3")));
    designer.drag_hover(id("child-1"), 0.3);
    assert!(designer.complete_drop());

    let parent = designer.tree().find(id("child-1")).unwrap();
    let order: Vec<NodeId> = parent.children.iter().map(|c| c.id).collect();
    assert_eq!(order, vec![id("child-3"), id("nested")]);
}

#[test]
fn drop_into_own_descendant_is_rejected() {
    let mut designer = make_designer();

    assert!(designer.start_node_drag(id("child-1")));
    designer.drag_hover(id("nested"), 0.5);
    assert!(!designer.complete_drop());
    assert!(!designer.can_undo());
    assert_eq!(designer.tree().root.children.len(), 3);
}

#[test]
fn root_is_not_draggable() {
    let mut designer = make_designer();
    assert!(!designer.start_node_drag(id("root")));
    assert_eq!(designer.dragging_node(), None);
}

#[test]
fn cancelled_drag_leaves_tree_and_history_untouched() {
    let mut designer = make_designer();
    let revision = designer.revision();

    assert!(designer.start_node_drag(id("child-2")));
    designer.drag_hover(id("child-1"), 0.9);
    designer.cancel_drag();
    assert!(!designer.complete_drop());

    assert_eq!(designer.revision(), revision);
    assert!(!designer.can_undo());
}

#[test]
fn drop_after_leaving_all_targets_commits_nothing() {
    let mut designer = make_designer();

    assert!(designer.start_node_drag(id("child-2")));
    designer.drag_hover(id("child-1"), 0.9);
    designer.drag_leave();
    assert!(!designer.complete_drop());
    assert!(!designer.can_undo());
}

#[test]
fn hover_updates_are_not_history_entries() {
    let mut designer = make_designer();

    assert!(designer.start_node_drag(id("child-2")));
    for fraction in [0.1, 0.4, 0.6, 0.9] {
        designer.drag_hover(id("child-1"), fraction);
    }
    assert!(!designer.can_undo());
    assert!(designer.complete_drop());
    let mut steps = 0;
    while designer.undo() {
        steps += 1;
    }
    assert_eq!(steps, 1, "a whole drag session is one history entry");
}

// ─── Clipboard scenarios ────────────────────────────────────────────────

#[test]
fn cut_then_paste_roundtrip() {
    let mut designer = make_designer();

    assert!(designer.cut(id("child-2")));
    assert_eq!(designer.tree().root.children.len(), 2);
    assert!(designer.can_paste());

    assert!(designer.paste(Some(id("root"))));
    assert_eq!(designer.tree().root.children.len(), 3);
}

#[test]
fn duplicate_inserts_adjacent_twin() {
    let mut designer = make_designer();

    assert!(designer.duplicate(id("child-1")));
    let children = &designer.tree().root.children;
    assert_eq!(children.len(), 4);
    assert_eq!(children[1].kind, children[0].kind);
    assert_ne!(children[1].id, children[0].id);
    // Nested descendants are re-identified too.
    assert_eq!(
        designer.tree().collect_ids().len(),
        designer.tree().node_count()
    );
}

// ─── Keyboard commands ──────────────────────────────────────────────────

#[test]
fn keyboard_copy_paste_flow() {
    let mut designer = make_designer();
    designer.select(Some(id("child-1")));

    assert!(designer.handle_key("c", CMD, false));
    assert!(designer.can_paste());
    // Paste lands on the selected node.
    assert!(designer.handle_key("v", CMD, false));

    let target = designer.tree().find(id("child-1")).unwrap();
    assert_eq!(target.children.len(), 2);
    assert_eq!(target.children[1].kind, "card");
}

#[test]
fn keyboard_delete_and_undo() {
    let mut designer = make_designer();
    designer.select(Some(id("child-3")));

    assert!(designer.handle_key("Backspace", Modifiers::NONE, false));
    assert_eq!(designer.tree().root.children.len(), 2);

    assert!(designer.handle_key("z", CMD, false));
    assert_eq!(designer.tree().root.children.len(), 3);
}

#[test]
fn keyboard_sibling_moves() {
    let mut designer = make_designer();
    designer.select(Some(id("child-3")));

    assert!(designer.handle_key("ArrowUp", CMD, false));
    let order: Vec<NodeId> = designer.tree().root.children.iter().map(|c| c.id).collect();
    assert_eq!(order, vec![id("child-1"), id("child-3"), id("child-2")]);
}

#[test]
fn commands_are_no_ops_without_preconditions() {
    let mut designer = make_designer();

    // Nothing selected, empty clipboard.
    assert!(!designer.handle_key("c", CMD, false));
    assert!(!designer.handle_key("x", CMD, false));
    assert!(!designer.handle_key("d", CMD, false));
    assert!(!designer.handle_key("Delete", Modifiers::NONE, false));
    assert!(!designer.handle_key("v", CMD, false), "empty register");
    assert!(!designer.handle_key("z", CMD, false), "empty history");
    assert!(!designer.can_undo());
}

#[test]
fn shortcuts_suppressed_while_editing_text() {
    let mut designer = make_designer();
    designer.select(Some(id("child-1")));

    assert!(!designer.handle_key("Backspace", Modifiers::NONE, true));
    assert_eq!(designer.tree().root.children.len(), 3);
}

#[test]
fn paste_falls_back_to_root_by_default() {
    let mut designer = make_designer();
    assert!(designer.copy(id("child-2")));

    designer.select(None);
    assert!(designer.handle_key("v", CMD, false));
    assert_eq!(designer.tree().root.children.len(), 4);
}

#[test]
fn paste_fallback_none_requires_explicit_target() {
    let doc = r#"{ "id": "root", "type": "page" }"#;
    let mut designer = Designer::new(parse_document(doc).unwrap(), catalog())
        .with_paste_fallback(PasteFallback::None);

    // Nothing to paste into without a selection.
    assert!(!designer.paste(None));
}

// ─── Export ─────────────────────────────────────────────────────────────

#[test]
fn export_reflects_committed_edits() {
    let mut designer = make_designer();
    assert!(designer.remove(id("child-2")));

    let out = designer.export();
    let reimported = parse_document(&out).unwrap();
    assert_eq!(reimported.root.children.len(), 2);
    assert!(!reimported.contains(id("child-2")));
}
