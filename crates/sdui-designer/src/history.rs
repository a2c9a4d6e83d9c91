//! Linear undo/redo history.
//!
//! Snapshots are whole trees — cheap, because mutations share every
//! untouched subtree with their predecessor. `past` and `future` are plain
//! stacks: committing pushes the pre-mutation tree onto `past` and clears
//! `future`; undo/redo shuttle the current tree between the two.
//!
//! Refused mutations never reach [`History::commit`] — that contract lives
//! with the caller (the controller), and is what keeps undo steps aligned
//! with user-visible changes.

use sdui_core::SchemaTree;

pub struct History {
    past: Vec<SchemaTree>,
    current: SchemaTree,
    future: Vec<SchemaTree>,
    /// Maximum undo depth; the oldest entry is trimmed beyond it.
    max_depth: usize,
}

impl History {
    pub fn new(initial: SchemaTree, max_depth: usize) -> Self {
        Self {
            past: Vec::new(),
            current: initial,
            future: Vec::new(),
            max_depth,
        }
    }

    pub fn current(&self) -> &SchemaTree {
        &self.current
    }

    /// Record a committed mutation: the pre-mutation tree becomes
    /// undoable, and any redo branch is discarded.
    pub fn commit(&mut self, next: SchemaTree) {
        let previous = std::mem::replace(&mut self.current, next);
        self.past.push(previous);
        if self.past.len() > self.max_depth {
            self.past.remove(0);
        }
        self.future.clear();
    }

    /// Step back one snapshot. False when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, previous);
        self.future.push(current);
        true
    }

    /// Step forward one snapshot. False when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, next);
        self.past.push(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}
