//! The designer controller.
//!
//! Owns the single current tree (through [`History`]), the selection, the
//! clipboard, and the drag session, and exposes the public API the host
//! wires keyboard/pointer events into. Every committed mutation runs
//! synchronously to completion on the caller's thread; there is no
//! interleaving and no lock discipline — single writer by design.
//!
//! Refused mutations (unknown IDs, cycles, root protection) are logged and
//! swallowed: for an interactive editor, leaving state untouched is always
//! the safe answer to a stale or illegal event, and no refusal may ever
//! create a history entry.

use crate::catalog::{ComponentCatalog, draft_from_palette};
use crate::clipboard::ClipboardManager;
use crate::drag::{DragSession, DragSource, resolve_drop};
use crate::history::History;
use crate::selection::SelectionModel;
use crate::shortcuts::{EditAction, Modifiers, ShortcutMap};
use sdui_core::{
    DraftNode, MutationResult, NodeId, SchemaTree, SiblingDirection, ValidationError,
    emit_document, mutate, parse_document,
};
use serde_json::{Map, Value};

/// Default undo depth.
const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Where `paste` lands when no explicit target is given. Hosts with a
/// tree panel usually want the root; free-form canvases may prefer to
/// require an explicit target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasteFallback {
    #[default]
    Root,
    None,
}

pub struct Designer<C: ComponentCatalog> {
    history: History,
    selection: SelectionModel,
    clipboard: ClipboardManager,
    drag: DragSession,
    catalog: C,
    paste_fallback: PasteFallback,
    /// Bumped on every committed change (mutations, undo, redo).
    revision: u64,
}

impl<C: ComponentCatalog> Designer<C> {
    pub fn new(tree: SchemaTree, catalog: C) -> Self {
        Self {
            history: History::new(tree, DEFAULT_HISTORY_DEPTH),
            selection: SelectionModel::new(),
            clipboard: ClipboardManager::new(),
            drag: DragSession::new(),
            catalog,
            paste_fallback: PasteFallback::default(),
            revision: 0,
        }
    }

    /// Import a JSON document and build a designer around it.
    pub fn from_document(input: &str, catalog: C) -> Result<Self, ValidationError> {
        let tree = parse_document(input).inspect_err(|e| {
            log::warn!("document import failed: {e}");
        })?;
        Ok(Self::new(tree, catalog))
    }

    pub fn with_paste_fallback(mut self, fallback: PasteFallback) -> Self {
        self.paste_fallback = fallback;
        self
    }

    // ─── Read surface (for the renderer collaborator) ────────────────────

    /// The current tree. The renderer re-reads this after every revision bump.
    pub fn tree(&self) -> &SchemaTree {
        self.history.current()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Serialize the current tree for the host's persistence collaborator.
    /// Saving itself is the host's job and must never gate further edits.
    pub fn export(&self) -> String {
        emit_document(self.tree())
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selected(&self) -> Option<NodeId> {
        self.selection.selected()
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.selection.hovered()
    }

    /// Select a node (clears with `None`). Unknown IDs clear the selection.
    pub fn select(&mut self, id: Option<NodeId>) {
        match id {
            Some(id) if self.tree().contains(id) => self.selection.select(Some(id)),
            _ => self.selection.select(None),
        }
    }

    pub fn hover(&mut self, id: Option<NodeId>) {
        self.selection.hover(id);
    }

    // ─── Structural mutations ────────────────────────────────────────────

    pub fn insert(&mut self, parent: NodeId, draft: &DraftNode, index: Option<usize>) -> bool {
        let result = mutate::insert(self.tree(), parent, draft, index);
        self.apply("insert", result)
    }

    /// Materialize a node from the palette template for `kind` and insert it.
    pub fn insert_from_palette(
        &mut self,
        kind: &str,
        parent: NodeId,
        index: Option<usize>,
    ) -> bool {
        let draft = draft_from_palette(&self.catalog, kind);
        self.insert(parent, &draft, index)
    }

    pub fn update(&mut self, id: NodeId, patch: &Map<String, Value>) -> bool {
        let result = mutate::update(self.tree(), id, patch);
        self.apply("update", result)
    }

    /// Commit the one mutation a resize gesture produces. Continuous
    /// pointer-move feedback during the gesture stays in the renderer;
    /// only the release reaches the engine, as a single history entry.
    pub fn commit_resize(&mut self, id: NodeId, patch: &Map<String, Value>) -> bool {
        self.update(id, patch)
    }

    pub fn remove(&mut self, id: NodeId) -> bool {
        let result = mutate::remove(self.tree(), id);
        self.apply("remove", result)
    }

    pub fn move_node(&mut self, id: NodeId, new_parent: NodeId, index: Option<usize>) -> bool {
        let result = mutate::move_node(self.tree(), id, new_parent, index);
        self.apply("move", result)
    }

    pub fn move_sibling(&mut self, id: NodeId, direction: SiblingDirection) -> bool {
        let result = mutate::move_sibling(self.tree(), id, direction);
        self.apply("move_sibling", result)
    }

    // ─── Clipboard ───────────────────────────────────────────────────────

    pub fn can_paste(&self) -> bool {
        self.clipboard.can_paste()
    }

    pub fn copy(&mut self, id: NodeId) -> bool {
        self.clipboard.copy(self.history.current(), id)
    }

    pub fn cut(&mut self, id: NodeId) -> bool {
        let result = self.clipboard.cut(self.history.current(), id);
        self.apply("cut", result)
    }

    /// Paste into `target`, or into the configured fallback target when
    /// `None`. A no-op when the register is empty or no target resolves.
    pub fn paste(&mut self, target: Option<NodeId>) -> bool {
        let target = match (target, self.paste_fallback) {
            (Some(id), _) => id,
            (None, PasteFallback::Root) => self.tree().root_id(),
            (None, PasteFallback::None) => return false,
        };
        let result = self.clipboard.paste(self.history.current(), target);
        self.apply("paste", result)
    }

    pub fn duplicate(&mut self, id: NodeId) -> bool {
        let result = self.clipboard.duplicate(self.history.current(), id);
        self.apply("duplicate", result)
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        if self.history.undo() {
            self.after_commit("undo");
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.history.redo() {
            self.after_commit("redo");
            true
        } else {
            false
        }
    }

    // ─── Drag session ────────────────────────────────────────────────────

    /// Begin dragging an existing node. The root is never draggable.
    pub fn start_node_drag(&mut self, id: NodeId) -> bool {
        if id == self.tree().root_id() || !self.tree().contains(id) {
            return false;
        }
        self.drag.begin(DragSource::Node(id));
        true
    }

    /// Begin dragging a new component type from the palette.
    pub fn start_palette_drag(&mut self, kind: impl Into<String>) {
        self.drag.begin(DragSource::Palette(kind.into()));
    }

    pub fn dragging_node(&self) -> Option<NodeId> {
        self.drag.dragging_node()
    }

    pub fn dragging_palette(&self) -> Option<&str> {
        self.drag.dragging_palette()
    }

    /// Hover update during a drag. Visual only — no history entry.
    pub fn drag_hover(&mut self, target: NodeId, fraction: f32) {
        self.drag.hover(target, fraction);
        self.selection.hover(Some(target));
    }

    pub fn drag_leave(&mut self) {
        self.drag.leave();
        self.selection.hover(None);
    }

    /// End the drag without dropping. Tree and history stay untouched.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
        self.selection.hover(None);
    }

    /// Terminal drop: resolve the hovered target to a `(parent, index)`
    /// slot and commit the move (existing node) or insert (palette type).
    /// Returns whether a mutation committed.
    pub fn complete_drop(&mut self) -> bool {
        self.selection.hover(None);
        let Some(pending) = self.drag.complete() else {
            return false;
        };
        let Some((parent, index)) = resolve_drop(self.tree(), pending.target, pending.fraction)
        else {
            return false;
        };
        match pending.source {
            DragSource::Node(id) => self.move_node(id, parent, Some(index)),
            DragSource::Palette(kind) => self.insert_from_palette(&kind, parent, Some(index)),
        }
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Route a key event through the shortcut table. Returns whether the
    /// event was consumed (so hosts know to call `preventDefault`).
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers, in_text_input: bool) -> bool {
        match ShortcutMap::resolve(key, modifiers, in_text_input) {
            Some(action) => self.perform(action),
            None => false,
        }
    }

    /// Execute an edit action. Each action is a no-op when its
    /// precondition (a selection, a non-empty clipboard) is not met.
    pub fn perform(&mut self, action: EditAction) -> bool {
        match action {
            EditAction::Undo => self.undo(),
            EditAction::Redo => self.redo(),
            EditAction::Copy => match self.selected() {
                Some(id) => self.copy(id),
                None => false,
            },
            EditAction::Cut => match self.selected() {
                Some(id) => self.cut(id),
                None => false,
            },
            EditAction::Paste => self.paste(self.selected()),
            EditAction::Duplicate => match self.selected() {
                Some(id) => self.duplicate(id),
                None => false,
            },
            EditAction::Delete => match self.selected() {
                Some(id) => self.remove(id),
                None => false,
            },
            EditAction::MoveSiblingUp => match self.selected() {
                Some(id) => self.move_sibling(id, SiblingDirection::Up),
                None => false,
            },
            EditAction::MoveSiblingDown => match self.selected() {
                Some(id) => self.move_sibling(id, SiblingDirection::Down),
                None => false,
            },
        }
    }

    // ─── Commit plumbing ─────────────────────────────────────────────────

    fn apply(&mut self, op: &str, result: MutationResult) -> bool {
        match result {
            MutationResult::Applied(next) => {
                self.history.commit(next);
                self.after_commit(op);
                true
            }
            MutationResult::Refused(reason) => {
                log::debug!("{op} refused: {reason:?}");
                false
            }
        }
    }

    fn after_commit(&mut self, op: &str) {
        self.revision += 1;
        self.selection.prune(self.history.current());
        log::debug!("{op} committed, revision {}", self.revision);
    }
}
