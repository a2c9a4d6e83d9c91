//! Integration tests: structural invariants across mutation sequences.
//!
//! After every applied mutation the tree must keep: one stable root,
//! pairwise distinct ids, acyclicity, and child order except where
//! explicitly reordered. These tests drive mixed sequences through the
//! public API and re-check the invariants at every step.

use pretty_assertions::assert_eq;
use sdui_core::{DraftNode, NodeId, SchemaTree, SiblingDirection, mutate, parse_document};
use serde_json::{Map, json};
use std::collections::HashSet;

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

fn check_invariants(tree: &SchemaTree, expected_root: NodeId) {
    assert_eq!(tree.root_id(), expected_root, "root id must never change");
    // Pairwise distinct ids. (An id reachable twice would also mean a
    // cycle or a duplicated subtree, so this covers acyclicity for a
    // tree built of parent-owned children.)
    let mut seen = HashSet::new();
    let mut stack = vec![tree.root.as_ref()];
    while let Some(node) = stack.pop() {
        assert!(seen.insert(node.id), "duplicate id {}", node.id);
        stack.extend(node.children.iter().map(|c| c.as_ref()));
    }
}

fn fixture() -> SchemaTree {
    parse_document(
        r#"{ "id": "root", "type": "page",
             "children": [
               { "id": "header", "type": "row",
                 "children": [ { "id": "logo", "type": "image" },
                               { "id": "nav", "type": "menu" } ] },
               { "id": "body", "type": "column" },
               { "id": "footer", "type": "row" } ] }"#,
    )
    .unwrap()
}

#[test]
fn invariants_hold_across_mixed_sequence() {
    let root = id("root");
    let mut tree = fixture();
    check_invariants(&tree, root);

    // Insert a nested draft into the body.
    let mut draft = DraftNode::new("card");
    draft.children.push(DraftNode::new("text"));
    tree = mutate::insert(&tree, id("body"), &draft, None).into_applied().unwrap();
    check_invariants(&tree, root);

    // Reparent the nav under the footer.
    tree = mutate::move_node(&tree, id("nav"), id("footer"), Some(0))
        .into_applied()
        .unwrap();
    check_invariants(&tree, root);
    assert_eq!(tree.parent_of(id("nav")), Some((id("footer"), 0)));

    // Update props on the header.
    let mut patch = Map::new();
    patch.insert("sticky".into(), json!(true));
    tree = mutate::update(&tree, id("header"), &patch).into_applied().unwrap();
    check_invariants(&tree, root);

    // Reorder and remove.
    tree = mutate::move_sibling(&tree, id("footer"), SiblingDirection::Up)
        .into_applied()
        .unwrap();
    check_invariants(&tree, root);
    tree = mutate::remove(&tree, id("header")).into_applied().unwrap();
    check_invariants(&tree, root);
    assert!(!tree.contains(id("logo")), "subtree removal takes descendants");
    // nav was moved out of the header earlier, so it survives.
    assert!(tree.contains(id("nav")));
}

#[test]
fn every_refusal_leaves_the_tree_identical() {
    let tree = fixture();
    let before = tree.root.clone();

    let refusals = [
        mutate::remove(&tree, id("root")),
        mutate::remove(&tree, id("ghost")),
        mutate::move_node(&tree, id("header"), id("logo"), None),
        mutate::move_node(&tree, id("header"), id("header"), None),
        mutate::move_node(&tree, id("root"), id("body"), None),
        mutate::move_sibling(&tree, id("logo"), SiblingDirection::Up),
        mutate::insert(&tree, id("ghost"), &DraftNode::new("text"), None),
        mutate::update(&tree, id("ghost"), &Map::new()),
    ];
    for refusal in refusals {
        assert!(!refusal.is_applied());
    }
    assert_eq!(tree.root.as_ref(), before.as_ref());
}

#[test]
fn move_to_descendant_refused_for_every_descendant() {
    let tree = fixture();
    // header's proper descendants: logo, nav.
    for target in ["header", "logo", "nav"] {
        let result = mutate::move_node(&tree, id("header"), id(target), Some(0));
        assert!(
            !result.is_applied(),
            "header must not move into {target}"
        );
    }
    // A non-descendant target works.
    assert!(mutate::move_node(&tree, id("header"), id("body"), Some(0)).is_applied());
}

#[test]
fn child_order_is_preserved_by_unrelated_mutations() {
    let tree = fixture();
    let mut patch = Map::new();
    patch.insert("width".into(), json!(960));
    let next = mutate::update(&tree, id("body"), &patch).into_applied().unwrap();

    let before: Vec<NodeId> = tree.root.children.iter().map(|c| c.id).collect();
    let after: Vec<NodeId> = next.root.children.iter().map(|c| c.id).collect();
    assert_eq!(before, after);

    let header_before: Vec<NodeId> =
        tree.find(id("header")).unwrap().children.iter().map(|c| c.id).collect();
    let header_after: Vec<NodeId> =
        next.find(id("header")).unwrap().children.iter().map(|c| c.id).collect();
    assert_eq!(header_before, header_after);
}
