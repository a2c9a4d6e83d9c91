//! JSON document import/export.
//!
//! On the wire a node is `{ "id", "type", ...props, "children" }`. Legacy
//! documents use three child-slot shapes — absent, a single object, or an
//! array — which import normalizes to one ordered sequence. Export always
//! emits the array form.
//!
//! Import is the one place that raises real errors: a structurally invalid
//! document (duplicate IDs, missing `type`, excessive depth) fails with a
//! [`ValidationError`] instead of being silently repaired.

use crate::id::NodeId;
use crate::identity::{DraftNode, ensure_ids};
use crate::node::{MAX_DEPTH, SchemaNode, SchemaTree};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Reserved wire keys, never stored in `props`.
const RESERVED_KEYS: [&str; 3] = ["id", "type", "children"];

/// Why a document failed to import.
#[derive(Debug)]
pub enum ValidationError {
    /// The input is not valid JSON at all.
    Json(serde_json::Error),
    /// A node slot holds something other than a JSON object.
    NotAnObject { path: String },
    /// A node has no `type` tag (or a non-string one).
    MissingType { path: String },
    /// A node's `id` is present but not a string.
    InvalidId { path: String },
    /// A `children` slot is neither absent, an object, nor an array.
    InvalidChildren { path: String },
    /// Two nodes carry the same explicit ID.
    DuplicateId(String),
    /// The document nests deeper than [`MAX_DEPTH`] levels.
    TooDeep { path: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Json(e) => write!(f, "invalid JSON: {e}"),
            ValidationError::NotAnObject { path } => {
                write!(f, "{path}: node must be a JSON object")
            }
            ValidationError::MissingType { path } => {
                write!(f, "{path}: missing required string field `type`")
            }
            ValidationError::InvalidId { path } => {
                write!(f, "{path}: `id` must be a string")
            }
            ValidationError::InvalidChildren { path } => {
                write!(f, "{path}: `children` must be an object or an array")
            }
            ValidationError::DuplicateId(id) => {
                write!(f, "duplicate node id {id:?}")
            }
            ValidationError::TooDeep { path } => {
                write!(f, "{path}: document exceeds the depth bound of {MAX_DEPTH}")
            }
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ValidationError::Json(e) => Some(e),
            _ => None,
        }
    }
}

/// Parse a JSON document string into a [`SchemaTree`].
///
/// Validates structure (see [`ValidationError`]) and runs identity
/// assignment for any nodes missing an `id`.
#[must_use = "parsing result should be used"]
pub fn parse_document(input: &str) -> Result<SchemaTree, ValidationError> {
    let value: Value = serde_json::from_str(input).map_err(ValidationError::Json)?;
    let draft = draft_from_value(&value, "$", 0)?;

    let mut carried = HashSet::new();
    check_unique_ids(&draft, &mut carried)?;

    let mut taken = HashSet::new();
    let root = ensure_ids(&draft, &mut taken);
    Ok(SchemaTree::new(root))
}

/// Serialize a tree back to JSON text. Children always come out as an
/// ordered array, whatever shape they were imported from.
#[must_use]
pub fn emit_document(tree: &SchemaTree) -> String {
    let value = node_to_value(&tree.root);
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

/// Convert one wire value into a draft node, normalizing the child slot.
pub fn draft_from_value(value: &Value, path: &str, depth: usize) -> Result<DraftNode, ValidationError> {
    if depth > MAX_DEPTH {
        return Err(ValidationError::TooDeep { path: path.to_string() });
    }
    let Some(obj) = value.as_object() else {
        return Err(ValidationError::NotAnObject { path: path.to_string() });
    };

    let id = match obj.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(NodeId::intern(s)),
        Some(_) => return Err(ValidationError::InvalidId { path: path.to_string() }),
    };
    let kind = match obj.get("type") {
        Some(Value::String(s)) => s.clone(),
        _ => return Err(ValidationError::MissingType { path: path.to_string() }),
    };

    let children = match obj.get("children") {
        None | Some(Value::Null) => Vec::new(),
        Some(single @ Value::Object(_)) => {
            vec![draft_from_value(single, &format!("{path}.children"), depth + 1)?]
        }
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                draft_from_value(item, &format!("{path}.children[{i}]"), depth + 1)
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(ValidationError::InvalidChildren { path: path.to_string() });
        }
    };

    let props: Map<String, Value> = obj
        .iter()
        .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(DraftNode { id, kind, props, children })
}

/// Lenient child-slot reader for `update` patches: accepts the same three
/// shapes as import but answers `None` on anything malformed instead of
/// erroring, so a bad patch key degrades to a skipped key.
pub fn drafts_from_children_value(value: &Value) -> Option<Vec<DraftNode>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::Object(_) => draft_from_value(value, "$", 0).ok().map(|d| vec![d]),
        Value::Array(items) => items
            .iter()
            .map(|item| draft_from_value(item, "$", 0).ok())
            .collect(),
        _ => None,
    }
}

/// Convert a live node to its wire value.
pub fn node_to_value(node: &SchemaNode) -> Value {
    let mut obj = Map::new();
    obj.insert("id".into(), Value::String(node.id.as_str().to_string()));
    obj.insert("type".into(), Value::String(node.kind.clone()));
    for (key, value) in &node.props {
        if !RESERVED_KEYS.contains(&key.as_str()) {
            obj.insert(key.clone(), value.clone());
        }
    }
    let children: Vec<Value> = node.children.iter().map(|c| node_to_value(c)).collect();
    obj.insert("children".into(), Value::Array(children));
    Value::Object(obj)
}

fn check_unique_ids(draft: &DraftNode, seen: &mut HashSet<NodeId>) -> Result<(), ValidationError> {
    if let Some(id) = draft.id
        && !seen.insert(id)
    {
        return Err(ValidationError::DuplicateId(id.as_str().to_string()));
    }
    for child in &draft.children {
        check_unique_ids(child, seen)?;
    }
    Ok(())
}
