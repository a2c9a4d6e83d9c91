//! Selection and hover state.
//!
//! Holds which node is selected and which is hovered. Both are plain
//! references into the current tree and may go stale when a mutation or an
//! undo removes the node — [`SelectionModel::prune`] drops stale IDs after
//! every committed change. Drag state lives in the drag session
//! ([`crate::drag::DragSession`]), not here.

use sdui_core::{NodeId, SchemaTree};

#[derive(Debug, Default)]
pub struct SelectionModel {
    selected: Option<NodeId>,
    hovered: Option<NodeId>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Select a node, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }

    pub fn hover(&mut self, id: Option<NodeId>) {
        self.hovered = id;
    }

    /// Drop any reference that no longer resolves in `tree`.
    pub fn prune(&mut self, tree: &SchemaTree) {
        if let Some(id) = self.selected
            && !tree.contains(id)
        {
            self.selected = None;
        }
        if let Some(id) = self.hovered
            && !tree.contains(id)
        {
            self.hovered = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdui_core::SchemaNode;

    #[test]
    fn prune_drops_stale_ids() {
        let tree = SchemaTree::new(SchemaNode::new(NodeId::intern("root"), "page"));
        let mut sel = SelectionModel::new();
        sel.select(Some(NodeId::intern("gone")));
        sel.hover(Some(NodeId::intern("root")));
        sel.prune(&tree);
        assert_eq!(sel.selected(), None);
        assert_eq!(sel.hovered(), Some(NodeId::intern("root")));
    }
}
