//! Component catalog collaborator.
//!
//! When a palette drag drops, the new node is materialized from the
//! component type's template. The catalog is injected into the designer at
//! construction time — never resolved from ambient global state — so hosts
//! and tests control exactly which components exist.

use sdui_core::DraftNode;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Defaults a component type contributes to a freshly inserted node.
#[derive(Debug, Clone, Default)]
pub struct ComponentTemplate {
    pub default_props: Map<String, Value>,
    pub default_children: Vec<DraftNode>,
}

/// Resolves a component type tag to its template.
pub trait ComponentCatalog {
    fn template(&self, kind: &str) -> Option<ComponentTemplate>;
}

/// Map-backed catalog, enough for hosts that register components up front.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    templates: HashMap<String, ComponentTemplate>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, kind: impl Into<String>, template: ComponentTemplate) -> &mut Self {
        self.templates.insert(kind.into(), template);
        self
    }
}

impl ComponentCatalog for StaticCatalog {
    fn template(&self, kind: &str) -> Option<ComponentTemplate> {
        self.templates.get(kind).cloned()
    }
}

/// Build the draft node a palette drop inserts. Unknown kinds materialize
/// as a bare node with empty props rather than failing the gesture.
pub fn draft_from_palette(catalog: &impl ComponentCatalog, kind: &str) -> DraftNode {
    let template = catalog.template(kind).unwrap_or_default();
    let mut draft = DraftNode::new(kind);
    draft.props = template.default_props;
    draft.children = template.default_children;
    draft
}
