pub mod catalog;
pub mod clipboard;
pub mod controller;
pub mod drag;
pub mod history;
pub mod selection;
pub mod shortcuts;

pub use catalog::{ComponentCatalog, ComponentTemplate, StaticCatalog, draft_from_palette};
pub use clipboard::ClipboardManager;
pub use controller::{Designer, PasteFallback};
pub use drag::{DragSession, DragSource, DragState, PendingDrop, resolve_drop};
pub use history::History;
pub use selection::SelectionModel;
pub use shortcuts::{EditAction, Modifiers, ShortcutMap};
