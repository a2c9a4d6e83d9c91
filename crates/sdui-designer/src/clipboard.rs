//! Clipboard: copy / cut / paste / duplicate.
//!
//! A single-slot register holds a detached subtree. Trees are immutable,
//! so the register can share the subtree's allocation with past snapshots:
//! a `copy` stays valid after the original is removed from the live tree.
//! Pastes re-identify a clone and never touch the register, so one copy
//! supports any number of pastes.

use sdui_core::{
    DraftNode, MutationResult, NodeId, Refusal, SchemaNode, SchemaTree, mutate, reassign_ids,
};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ClipboardManager {
    register: Option<Arc<SchemaNode>>,
}

impl ClipboardManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff the register is non-empty.
    pub fn can_paste(&self) -> bool {
        self.register.is_some()
    }

    /// Snapshot the subtree rooted at `id` into the register, overwriting
    /// any previous contents. Returns false for unknown IDs.
    pub fn copy(&mut self, tree: &SchemaTree, id: NodeId) -> bool {
        match subtree_handle(tree, id) {
            Some(subtree) => {
                self.register = Some(subtree);
                true
            }
            None => false,
        }
    }

    /// Copy then remove. The register is only overwritten when the remove
    /// actually applies, so cutting the root leaves the clipboard intact.
    pub fn cut(&mut self, tree: &SchemaTree, id: NodeId) -> MutationResult {
        let Some(subtree) = subtree_handle(tree, id) else {
            return MutationResult::Refused(Refusal::NotFound);
        };
        let result = mutate::remove(tree, id);
        if result.is_applied() {
            self.register = Some(subtree);
        }
        result
    }

    /// Insert a re-identified clone of the register as the last child of
    /// `target`. The register itself is never mutated, so repeated pastes
    /// each produce a fresh set of IDs.
    pub fn paste(&self, tree: &SchemaTree, target: NodeId) -> MutationResult {
        let Some(register) = &self.register else {
            return MutationResult::Refused(Refusal::NoChange);
        };
        let mut taken = tree.collect_ids();
        let clone = reassign_ids(register, &mut taken);
        mutate::insert(tree, target, &DraftNode::from(&clone), None)
    }

    /// Insert a re-identified clone of `id` as its next sibling
    /// (same parent, index + 1). Does not involve the register.
    pub fn duplicate(&self, tree: &SchemaTree, id: NodeId) -> MutationResult {
        let Some((parent, slot)) = tree.parent_of(id) else {
            return MutationResult::Refused(if tree.contains(id) {
                Refusal::RootProtected // the root has no siblings
            } else {
                Refusal::NotFound
            });
        };
        let Some(subtree) = subtree_handle(tree, id) else {
            return MutationResult::Refused(Refusal::NotFound);
        };
        let mut taken = tree.collect_ids();
        let clone = reassign_ids(&subtree, &mut taken);
        mutate::insert(tree, parent, &DraftNode::from(&clone), Some(slot + 1))
    }
}

/// The `Arc` handle of the subtree rooted at `id`, detached from any
/// parent context.
fn subtree_handle(tree: &SchemaTree, id: NodeId) -> Option<Arc<SchemaNode>> {
    if id == tree.root_id() {
        return Some(Arc::clone(&tree.root));
    }
    let (parent, slot) = tree.parent_of(id)?;
    tree.find(parent).map(|p| Arc::clone(&p.children[slot]))
}
