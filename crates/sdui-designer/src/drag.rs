//! Drag-and-drop session state machine and drop-target resolution.
//!
//! A drag is a multi-event session:
//!
//! ```text
//! Idle ──begin──▶ Dragging ──hover──▶ Hovering ──complete──▶ Idle (+ PendingDrop)
//!   ▲                │  ▲                │
//!   └────cancel──────┘  └────leave───────┘
//! ```
//!
//! Only `complete` from `Hovering` yields a [`PendingDrop`]; every other
//! exit leaves the tree and history untouched. The machine knows nothing
//! about rendering — the host maps pointer coordinates to a node ID and a
//! vertical fraction and feeds them in.

use sdui_core::{NodeId, SchemaTree};

/// What is being dragged: an existing node, or a fresh component type from
/// the palette. Mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    Node(NodeId),
    Palette(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        source: DragSource,
    },
    Hovering {
        source: DragSource,
        target: NodeId,
        /// Pointer's vertical position within the target element,
        /// as a fraction 0.0–1.0 of its height.
        fraction: f32,
    },
}

/// A drop gesture that reached a valid target and awaits commitment.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDrop {
    pub source: DragSource,
    pub target: NodeId,
    pub fraction: f32,
}

#[derive(Debug)]
pub struct DragSession {
    state: DragState,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DragSession {
    pub fn new() -> Self {
        Self { state: DragState::Idle }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != DragState::Idle
    }

    /// The node being dragged, if the source is an existing node.
    pub fn dragging_node(&self) -> Option<NodeId> {
        match &self.state {
            DragState::Dragging { source } | DragState::Hovering { source, .. } => match source {
                DragSource::Node(id) => Some(*id),
                DragSource::Palette(_) => None,
            },
            DragState::Idle => None,
        }
    }

    /// The palette type being dragged, if any.
    pub fn dragging_palette(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { source } | DragState::Hovering { source, .. } => match source {
                DragSource::Palette(kind) => Some(kind),
                DragSource::Node(_) => None,
            },
            DragState::Idle => None,
        }
    }

    /// Start a drag. A begin while another session is active replaces it —
    /// the previous gesture never committed anything, so nothing is lost.
    pub fn begin(&mut self, source: DragSource) {
        self.state = DragState::Dragging { source };
    }

    /// Pointer entered (or moved within) a candidate target.
    /// Ignored while idle.
    pub fn hover(&mut self, target: NodeId, fraction: f32) {
        let source = match &self.state {
            DragState::Dragging { source } | DragState::Hovering { source, .. } => source.clone(),
            DragState::Idle => return,
        };
        self.state = DragState::Hovering {
            source,
            target,
            fraction: fraction.clamp(0.0, 1.0),
        };
    }

    /// Pointer left all valid targets; the session continues.
    pub fn leave(&mut self) {
        if let DragState::Hovering { source, .. } = &self.state {
            self.state = DragState::Dragging { source: source.clone() };
        }
    }

    /// Terminal drop. Yields a [`PendingDrop`] only when released over a
    /// target; a release in empty space ends the session with nothing.
    pub fn complete(&mut self) -> Option<PendingDrop> {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        match state {
            DragState::Hovering { source, target, fraction } => {
                Some(PendingDrop { source, target, fraction })
            }
            DragState::Dragging { .. } | DragState::Idle => None,
        }
    }

    /// Explicit cancel (e.g. Escape). Never commits.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Resolve a hovered target into a concrete `(parent, index)` slot.
///
/// The hovered node always becomes the new parent — there is no
/// reparenting onto a sibling. The upper half of the target prepends
/// (index 0); the lower half appends. Whether the drop is legal for a
/// particular dragged node (cycles) is decided by `move_node`, which is
/// authoritative.
#[must_use]
pub fn resolve_drop(tree: &SchemaTree, target: NodeId, fraction: f32) -> Option<(NodeId, usize)> {
    let node = tree.find(target)?;
    let index = if fraction <= 0.5 { 0 } else { node.children.len() };
    Some((target, index))
}
