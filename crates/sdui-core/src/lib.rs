pub mod document;
pub mod id;
pub mod identity;
pub mod mutate;
pub mod node;

pub use document::{ValidationError, emit_document, parse_document};
pub use id::NodeId;
pub use identity::{DraftNode, ensure_ids, fresh_id, reassign_ids};
pub use mutate::{MutationResult, Refusal, SiblingDirection};
pub use node::{MAX_DEPTH, SchemaNode, SchemaTree};
