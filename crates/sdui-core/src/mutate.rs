//! Structural mutation primitives.
//!
//! Every operation is a pure function from one [`SchemaTree`] to the next.
//! Operations that cannot apply safely refuse with a typed reason and leave
//! the input tree untouched — refusing is always a safe default for an
//! interactive editor, and refusals must never reach the history stack.
//!
//! Invariants held after every [`MutationResult::Applied`]:
//! 1. exactly one root, whose ID never changes;
//! 2. all IDs pairwise distinct;
//! 3. acyclic parent/child relation;
//! 4. child order preserved unless explicitly reordered.

use crate::document::drafts_from_children_value;
use crate::id::NodeId;
use crate::identity::{DraftNode, ensure_ids};
use crate::node::{SchemaNode, SchemaTree};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// Why a mutation was refused. All refusals are recoverable no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// The target ID (or parent ID) does not exist in the tree.
    NotFound,
    /// Removing or relocating the root is never allowed.
    RootProtected,
    /// The move would make a node its own ancestor.
    WouldCycle,
    /// The operation would leave the tree exactly as it is.
    NoChange,
}

/// Outcome of a structural mutation.
#[derive(Debug, Clone)]
pub enum MutationResult {
    Applied(SchemaTree),
    Refused(Refusal),
}

impl MutationResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationResult::Applied(_))
    }

    /// The new tree, if the mutation applied.
    pub fn into_applied(self) -> Option<SchemaTree> {
        match self {
            MutationResult::Applied(tree) => Some(tree),
            MutationResult::Refused(_) => None,
        }
    }

    /// The new tree, or `fallback` when refused.
    pub fn unwrap_or_tree(self, fallback: &SchemaTree) -> SchemaTree {
        match self {
            MutationResult::Applied(tree) => tree,
            MutationResult::Refused(_) => fallback.clone(),
        }
    }
}

/// Direction for [`move_sibling`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingDirection {
    Up,
    Down,
}

/// Insert `draft` as a child of `parent_id`.
///
/// The draft goes through identity assignment first, checked against the
/// live tree's IDs, so it and every nested descendant end up uniquely
/// identified. `index = None` appends; an out-of-range index clamps.
pub fn insert(
    tree: &SchemaTree,
    parent_id: NodeId,
    draft: &DraftNode,
    index: Option<usize>,
) -> MutationResult {
    if !tree.contains(parent_id) {
        return MutationResult::Refused(Refusal::NotFound);
    }
    let mut taken = tree.collect_ids();
    let node = Arc::new(ensure_ids(draft, &mut taken));
    match tree.map_path(parent_id, move |parent| {
        let mut parent = parent.clone();
        let slot = index.unwrap_or(parent.children.len()).min(parent.children.len());
        parent.children.insert(slot, node);
        parent
    }) {
        Some(next) => MutationResult::Applied(next),
        None => MutationResult::Refused(Refusal::NotFound),
    }
}

/// Shallow-merge `patch` into the node's props.
///
/// Reserved keys: `id` and `type` in the patch are ignored; `children`,
/// when present and well-formed, replaces the node's child sequence (the
/// replacement is re-identified against the rest of the tree). A merge
/// that changes nothing refuses with [`Refusal::NoChange`].
pub fn update(tree: &SchemaTree, id: NodeId, patch: &Map<String, Value>) -> MutationResult {
    let Some(existing) = tree.find(id) else {
        return MutationResult::Refused(Refusal::NotFound);
    };

    let mut props = existing.props.clone();
    let mut replacement_children = None;
    for (key, value) in patch {
        match key.as_str() {
            "id" | "type" => {
                log::debug!("update({id}): reserved key {key:?} ignored");
            }
            "children" => match drafts_from_children_value(value) {
                Some(drafts) => {
                    // IDs freed by dropping the old children are reusable.
                    let mut taken = tree.collect_ids();
                    for child in &existing.children {
                        remove_subtree_ids(child, &mut taken);
                    }
                    let children = drafts
                        .iter()
                        .map(|d| Arc::new(ensure_ids(d, &mut taken)))
                        .collect();
                    replacement_children = Some(children);
                }
                None => {
                    log::warn!("update({id}): malformed children value ignored");
                }
            },
            _ => {
                props.insert(key.clone(), value.clone());
            }
        }
    }

    if props == existing.props && replacement_children.is_none() {
        return MutationResult::Refused(Refusal::NoChange);
    }

    match tree.map_path(id, move |node| {
        let mut node = node.clone();
        node.props = props;
        if let Some(children) = replacement_children {
            node.children = children;
        }
        node
    }) {
        Some(next) => MutationResult::Applied(next),
        None => MutationResult::Refused(Refusal::NotFound),
    }
}

/// Remove the node and its entire subtree. The root is protected.
pub fn remove(tree: &SchemaTree, id: NodeId) -> MutationResult {
    if id == tree.root_id() {
        return MutationResult::Refused(Refusal::RootProtected);
    }
    let Some((parent_id, slot)) = tree.parent_of(id) else {
        return MutationResult::Refused(Refusal::NotFound);
    };
    match tree.map_path(parent_id, |parent| {
        let mut parent = parent.clone();
        parent.children.remove(slot);
        parent
    }) {
        Some(next) => MutationResult::Applied(next),
        None => MutationResult::Refused(Refusal::NotFound),
    }
}

/// Relocate a subtree under a new parent at `index` (clamped).
///
/// Refused when the node or target is unknown, when the node is the root,
/// and when the target parent is the node itself or one of its descendants
/// (the cycle check). Detach and re-attach happen in one step — history
/// observes a single snapshot.
pub fn move_node(
    tree: &SchemaTree,
    id: NodeId,
    new_parent: NodeId,
    index: Option<usize>,
) -> MutationResult {
    if id == tree.root_id() {
        return MutationResult::Refused(Refusal::RootProtected);
    }
    if id == new_parent {
        return MutationResult::Refused(Refusal::WouldCycle);
    }
    if !tree.contains(new_parent) {
        return MutationResult::Refused(Refusal::NotFound);
    }
    let Some((old_parent, slot)) = tree.parent_of(id) else {
        return MutationResult::Refused(Refusal::NotFound);
    };
    if tree.is_descendant(id, new_parent) {
        return MutationResult::Refused(Refusal::WouldCycle);
    }

    // Detach, keeping the subtree's allocation alive.
    let Some(detached) = tree.find(old_parent).map(|p| Arc::clone(&p.children[slot])) else {
        return MutationResult::Refused(Refusal::NotFound);
    };
    let Some(without) = tree.map_path(old_parent, |parent| {
        let mut parent = parent.clone();
        parent.children.remove(slot);
        parent
    }) else {
        return MutationResult::Refused(Refusal::NotFound);
    };

    // Re-attach. The index clamps against the post-detach sibling list.
    let Some(next) = without.map_path(new_parent, move |parent| {
        let mut parent = parent.clone();
        let at = index.unwrap_or(parent.children.len()).min(parent.children.len());
        parent.children.insert(at, detached);
        parent
    }) else {
        return MutationResult::Refused(Refusal::NotFound);
    };

    // A same-parent move that lands back in the same slot changes nothing.
    if new_parent == old_parent {
        let before = child_ids(tree, old_parent);
        let after = child_ids(&next, old_parent);
        if before == after {
            return MutationResult::Refused(Refusal::NoChange);
        }
    }

    MutationResult::Applied(next)
}

/// Swap a node with its adjacent sibling under the same parent.
/// A no-op at either boundary (and for the root, which has no siblings).
pub fn move_sibling(tree: &SchemaTree, id: NodeId, direction: SiblingDirection) -> MutationResult {
    let Some((parent_id, slot)) = tree.parent_of(id) else {
        return MutationResult::Refused(if tree.contains(id) {
            Refusal::NoChange // the root
        } else {
            Refusal::NotFound
        });
    };
    let Some(parent) = tree.find(parent_id) else {
        return MutationResult::Refused(Refusal::NotFound);
    };
    let other = match direction {
        SiblingDirection::Up if slot > 0 => slot - 1,
        SiblingDirection::Down if slot + 1 < parent.children.len() => slot + 1,
        _ => return MutationResult::Refused(Refusal::NoChange),
    };
    match tree.map_path(parent_id, |parent| {
        let mut parent = parent.clone();
        parent.children.swap(slot, other);
        parent
    }) {
        Some(next) => MutationResult::Applied(next),
        None => MutationResult::Refused(Refusal::NotFound),
    }
}

fn child_ids(tree: &SchemaTree, parent: NodeId) -> Vec<NodeId> {
    tree.find(parent)
        .map(|p| p.children.iter().map(|c| c.id).collect())
        .unwrap_or_default()
}

fn remove_subtree_ids(node: &SchemaNode, taken: &mut HashSet<NodeId>) {
    let mut stack = vec![node];
    while let Some(n) = stack.pop() {
        taken.remove(&n.id);
        stack.extend(n.children.iter().map(|c| c.as_ref()));
    }
}
