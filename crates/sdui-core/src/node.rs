//! Core schema tree data model.
//!
//! A document is a rooted tree of [`SchemaNode`]s. Every node carries an
//! opaque `kind` tag (the `type` field on the wire) naming which external
//! renderer template applies, an opaque `props` bag, and an ordered child
//! sequence. The engine never interprets `kind` or `props` — it only
//! guarantees structural integrity.
//!
//! Trees are immutable: mutations produce a new tree that shares every
//! untouched subtree with its predecessor by `Arc` reference. That sharing
//! is what makes history snapshots (undo/redo) cheap — see [`SchemaTree::map_path`].

use crate::id::NodeId;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::collections::HashSet;
use std::sync::Arc;

/// Traversal depth bound. Walks never descend past this many levels, so a
/// malformed or adversarial document cannot exhaust the stack.
pub const MAX_DEPTH: usize = 100;

/// Ordered child sequence. Most schema nodes have only a handful of children.
pub type ChildList = SmallVec<[Arc<SchemaNode>; 4]>;

/// A single node in the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// Globally unique within one tree; immutable once assigned.
    pub id: NodeId,

    /// Renderer/template tag (`type` on the wire). Opaque to this engine.
    pub kind: String,

    /// Arbitrary key/value attributes. `id`, `type`, and `children` are
    /// reserved wire keys and never appear here.
    pub props: Map<String, Value>,

    /// Ordered children. Order is significant and preserved unless
    /// explicitly reordered.
    pub children: ChildList,
}

impl SchemaNode {
    pub fn new(id: NodeId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            props: Map::new(),
            children: ChildList::new(),
        }
    }

    /// Number of nodes in the subtree rooted here (including this node).
    #[must_use]
    pub fn subtree_size(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<(&SchemaNode, usize)> = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            count += 1;
            if depth < MAX_DEPTH {
                stack.extend(node.children.iter().map(|c| (c.as_ref(), depth + 1)));
            }
        }
        count
    }
}

/// The complete document — a rooted hierarchy of [`SchemaNode`]s.
///
/// Cloning is cheap (one `Arc` bump); history snapshots are plain clones.
#[derive(Debug, Clone)]
pub struct SchemaTree {
    pub root: Arc<SchemaNode>,
}

impl SchemaTree {
    #[must_use]
    pub fn new(root: SchemaNode) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// The root node's ID. Stable for the life of the document.
    pub fn root_id(&self) -> NodeId {
        self.root.id
    }

    /// Depth-first lookup by ID. Bounded by [`MAX_DEPTH`].
    #[must_use]
    pub fn find(&self, id: NodeId) -> Option<&SchemaNode> {
        let mut stack: Vec<(&SchemaNode, usize)> = vec![(self.root.as_ref(), 0)];
        while let Some((node, depth)) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            if depth < MAX_DEPTH {
                // Reverse so the leftmost child is visited first.
                stack.extend(node.children.iter().rev().map(|c| (c.as_ref(), depth + 1)));
            }
        }
        None
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Find the parent of `id` and the child slot it occupies.
    /// Returns `None` for the root and for unknown IDs.
    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let mut stack: Vec<(&SchemaNode, usize)> = vec![(self.root.as_ref(), 0)];
        while let Some((node, depth)) = stack.pop() {
            if let Some(pos) = node.children.iter().position(|c| c.id == id) {
                return Some((node.id, pos));
            }
            if depth < MAX_DEPTH {
                stack.extend(node.children.iter().map(|c| (c.as_ref(), depth + 1)));
            }
        }
        None
    }

    /// Whether `candidate` lives strictly inside the subtree rooted at
    /// `ancestor`. `is_descendant(x, x)` is false; callers that also need
    /// the self case (cycle checks) test equality separately.
    #[must_use]
    pub fn is_descendant(&self, ancestor: NodeId, candidate: NodeId) -> bool {
        let Some(root) = self.find(ancestor) else {
            return false;
        };
        let mut stack: Vec<(&SchemaNode, usize)> = root
            .children
            .iter()
            .map(|c| (c.as_ref(), 1usize))
            .collect();
        while let Some((node, depth)) = stack.pop() {
            if node.id == candidate {
                return true;
            }
            if depth < MAX_DEPTH {
                stack.extend(node.children.iter().map(|c| (c.as_ref(), depth + 1)));
            }
        }
        false
    }

    /// Rewrite the node `id` via `f`, producing a new tree.
    ///
    /// Every node on the path from the root down to `id` (inclusive) is a
    /// fresh allocation; every subtree off that path is reused by `Arc`
    /// reference. Returns `None` when `id` is not in the tree (or lies
    /// beyond [`MAX_DEPTH`]), in which case no allocation happens.
    #[must_use]
    pub fn map_path<F>(&self, id: NodeId, f: F) -> Option<SchemaTree>
    where
        F: FnOnce(&SchemaNode) -> SchemaNode,
    {
        let mut f = Some(f);
        rewrite_path(&self.root, id, &mut f, 0).map(|root| SchemaTree { root })
    }

    /// Total number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.subtree_size()
    }

    /// Every ID currently in the tree.
    #[must_use]
    pub fn collect_ids(&self) -> HashSet<NodeId> {
        let mut ids = HashSet::new();
        let mut stack: Vec<(&SchemaNode, usize)> = vec![(self.root.as_ref(), 0)];
        while let Some((node, depth)) = stack.pop() {
            ids.insert(node.id);
            if depth < MAX_DEPTH {
                stack.extend(node.children.iter().map(|c| (c.as_ref(), depth + 1)));
            }
        }
        ids
    }
}

fn rewrite_path<F>(
    node: &Arc<SchemaNode>,
    id: NodeId,
    f: &mut Option<F>,
    depth: usize,
) -> Option<Arc<SchemaNode>>
where
    F: FnOnce(&SchemaNode) -> SchemaNode,
{
    if node.id == id {
        let f = f.take()?;
        return Some(Arc::new(f(node)));
    }
    if depth >= MAX_DEPTH {
        return None;
    }
    for (slot, child) in node.children.iter().enumerate() {
        if let Some(new_child) = rewrite_path(child, id, f, depth + 1) {
            // Shallow copy: sibling subtrees keep their Arcs.
            let mut copy = (**node).clone();
            copy.children[slot] = new_child;
            return Some(Arc::new(copy));
        }
    }
    None
}
