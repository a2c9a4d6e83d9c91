//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic [`EditAction`]s. The table lives
//! here so native and web hosts share one binding set. Every binding is
//! suppressed while focus sits inside an editable text control, so the
//! designer never hijacks ordinary text editing.

/// Modifier keys accompanying a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    /// The platform command key: ⌘ on macOS (`meta`), Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Actions keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    Duplicate,
    Delete,
    MoveSiblingUp,
    MoveSiblingDown,
}

/// Resolves key events into edit actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`,
    /// `"ArrowUp"`). `in_text_input` must be true while focus is inside an
    /// input/textarea/select/content-editable; every binding is suppressed
    /// then. Returns `None` for unbound combos.
    pub fn resolve(key: &str, modifiers: Modifiers, in_text_input: bool) -> Option<EditAction> {
        if in_text_input {
            return None;
        }
        let cmd = modifiers.command();

        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(EditAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(EditAction::Undo),
                "y" | "Y" => Some(EditAction::Redo),
                "c" | "C" => Some(EditAction::Copy),
                "x" | "X" => Some(EditAction::Cut),
                "v" | "V" => Some(EditAction::Paste),
                "d" | "D" => Some(EditAction::Duplicate),
                "ArrowUp" => Some(EditAction::MoveSiblingUp),
                "ArrowDown" => Some(EditAction::MoveSiblingDown),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(EditAction::Delete),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMD: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: true,
    };
    const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        alt: false,
        meta: false,
    };
    const CMD_SHIFT: Modifiers = Modifiers {
        ctrl: false,
        shift: true,
        alt: false,
        meta: true,
    };

    #[test]
    fn undo_redo_combos() {
        assert_eq!(ShortcutMap::resolve("z", CMD, false), Some(EditAction::Undo));
        assert_eq!(ShortcutMap::resolve("z", CTRL, false), Some(EditAction::Undo));
        assert_eq!(
            ShortcutMap::resolve("z", CMD_SHIFT, false),
            Some(EditAction::Redo)
        );
        assert_eq!(ShortcutMap::resolve("y", CMD, false), Some(EditAction::Redo));
    }

    #[test]
    fn clipboard_combos() {
        assert_eq!(ShortcutMap::resolve("c", CMD, false), Some(EditAction::Copy));
        assert_eq!(ShortcutMap::resolve("x", CTRL, false), Some(EditAction::Cut));
        assert_eq!(ShortcutMap::resolve("v", CMD, false), Some(EditAction::Paste));
        assert_eq!(
            ShortcutMap::resolve("d", CMD, false),
            Some(EditAction::Duplicate)
        );
    }

    #[test]
    fn delete_and_backspace() {
        assert_eq!(
            ShortcutMap::resolve("Delete", Modifiers::NONE, false),
            Some(EditAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", Modifiers::NONE, false),
            Some(EditAction::Delete)
        );
    }

    #[test]
    fn sibling_moves() {
        assert_eq!(
            ShortcutMap::resolve("ArrowUp", CMD, false),
            Some(EditAction::MoveSiblingUp)
        );
        assert_eq!(
            ShortcutMap::resolve("ArrowDown", CTRL, false),
            Some(EditAction::MoveSiblingDown)
        );
        // Plain arrows are not bound.
        assert_eq!(ShortcutMap::resolve("ArrowUp", Modifiers::NONE, false), None);
    }

    #[test]
    fn suppressed_inside_text_inputs() {
        assert_eq!(ShortcutMap::resolve("z", CMD, true), None);
        assert_eq!(ShortcutMap::resolve("Delete", Modifiers::NONE, true), None);
        assert_eq!(ShortcutMap::resolve("v", CMD, true), None);
    }

    #[test]
    fn unbound_keys() {
        assert_eq!(ShortcutMap::resolve("q", Modifiers::NONE, false), None);
        assert_eq!(ShortcutMap::resolve("z", Modifiers::NONE, false), None);
    }
}
