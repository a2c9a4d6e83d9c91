//! Node identity assignment.
//!
//! Wire documents and palette templates may omit IDs; live trees never do.
//! [`DraftNode`] is the "under construction" shape with optional IDs, and
//! [`ensure_ids`] promotes it to a fully identified [`SchemaNode`].
//! Generated IDs are checked against the live tree's ID set, not just
//! against the draft itself.

use crate::id::NodeId;
use crate::node::{ChildList, MAX_DEPTH, SchemaNode};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A node whose identity may not be settled yet. Produced by document
/// import and by palette templates; consumed by `insert`.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftNode {
    pub id: Option<NodeId>,
    pub kind: String,
    pub props: Map<String, Value>,
    pub children: Vec<DraftNode>,
}

impl DraftNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            props: Map::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(id: NodeId, kind: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            kind: kind.into(),
            props: Map::new(),
            children: Vec::new(),
        }
    }
}

impl From<&SchemaNode> for DraftNode {
    fn from(node: &SchemaNode) -> Self {
        Self {
            id: Some(node.id),
            kind: node.kind.clone(),
            props: node.props.clone(),
            children: node.children.iter().map(|c| DraftNode::from(c.as_ref())).collect(),
        }
    }
}

/// Generate a fresh ID of the form `<prefix>_<n>` that is absent from `taken`.
/// The counter is process-wide, so IDs stay unique across documents too.
pub fn fresh_id(prefix: &str, taken: &HashSet<NodeId>) -> NodeId {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    loop {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let id = NodeId::intern(&format!("{prefix}_{n}"));
        if !taken.contains(&id) {
            return id;
        }
    }
}

/// Promote a draft to a fully identified node.
///
/// Nodes that already carry an ID keep it — unless it collides with `taken`
/// (the live tree's IDs plus anything assigned earlier in this walk), in
/// which case a fresh ID is generated so the pairwise-distinct invariant
/// holds after the insert. Idempotent: re-running on an already fully
/// identified subtree with a disjoint `taken` set changes nothing.
///
/// Every ID used ends up in `taken`. Children below [`MAX_DEPTH`] levels
/// are dropped (document import refuses such trees outright).
pub fn ensure_ids(draft: &DraftNode, taken: &mut HashSet<NodeId>) -> SchemaNode {
    ensure_ids_at(draft, taken, 0)
}

fn ensure_ids_at(draft: &DraftNode, taken: &mut HashSet<NodeId>, depth: usize) -> SchemaNode {
    let id = match draft.id {
        Some(id) if !taken.contains(&id) => id,
        _ => fresh_id(&draft.kind, taken),
    };
    taken.insert(id);

    let children: ChildList = if depth < MAX_DEPTH {
        draft
            .children
            .iter()
            .map(|c| Arc::new(ensure_ids_at(c, taken, depth + 1)))
            .collect()
    } else {
        ChildList::new()
    };

    SchemaNode {
        id,
        kind: draft.kind.clone(),
        props: draft.props.clone(),
        children,
    }
}

/// Clone a subtree with a fresh ID for **every** node, disjoint from `taken`.
/// Used by paste and duplicate, which must never alias live IDs.
pub fn reassign_ids(node: &SchemaNode, taken: &mut HashSet<NodeId>) -> SchemaNode {
    reassign_ids_at(node, taken, 0)
}

fn reassign_ids_at(node: &SchemaNode, taken: &mut HashSet<NodeId>, depth: usize) -> SchemaNode {
    let id = fresh_id(&node.kind, taken);
    taken.insert(id);

    let children: ChildList = if depth < MAX_DEPTH {
        node.children
            .iter()
            .map(|c| Arc::new(reassign_ids_at(c, taken, depth + 1)))
            .collect()
    } else {
        ChildList::new()
    };

    SchemaNode {
        id,
        kind: node.kind.clone(),
        props: node.props.clone(),
        children,
    }
}
