//! Component tree for managing the canvas forest.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::{strip_editor_fields, CodecMode, Component, ComponentId, GROUP_TYPE};

/// Identifier of the synthetic root group used for serialization.
pub const ROOT_ID: &str = "component_tree";

/// Display name of the synthetic root group.
const ROOT_NAME: &str = "-";

/// The ordered forest of components on the canvas.
///
/// Every component id in the forest, descendants included, is registered in an
/// index so lookups and duplicate detection do not need a walk.
#[derive(Debug, Clone, Default)]
pub struct ComponentTree {
    /// Root-level components in paint order.
    roots: Vec<Component>,
    /// Ids of all registered components.
    registered: HashSet<ComponentId>,
}

impl ComponentTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Root-level components in paint order.
    #[must_use]
    pub fn roots(&self) -> &[Component] {
        &self.roots
    }

    /// Number of root-level components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether the tree has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether a component with this id is registered anywhere in the tree.
    #[must_use]
    pub fn contains(&self, id: &ComponentId) -> bool {
        self.registered.contains(id)
    }

    /// Number of registered components, descendants included.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    /// Visit every component in the forest in pre-order.
    pub fn traverse<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&'a Component),
    {
        for root in &self.roots {
            root.traverse(&mut visit);
        }
    }

    /// Register a component and its descendants in the id index.
    fn register(&mut self, component: &Component) {
        component.traverse(&mut |c| {
            if !self.registered.insert(c.id.clone()) {
                tracing::warn!("Component id {} registered twice", c.id);
            }
        });
    }

    /// Drop a component and its descendants from the id index.
    fn unregister(&mut self, component: &Component) {
        component.traverse(&mut |c| {
            self.registered.remove(&c.id);
        });
    }

    /// Append components as new roots, registering them and their descendants.
    pub fn insert_roots(&mut self, components: impl IntoIterator<Item = Component>) {
        for component in components {
            self.register(&component);
            self.roots.push(component);
        }
    }

    /// Unregister every root and empty the tree.
    pub fn clear(&mut self) {
        let roots = std::mem::take(&mut self.roots);
        for root in &roots {
            self.unregister(root);
        }
        tracing::debug!("Cleared {} root components", roots.len());
    }

    /// Build the document form of this forest under the synthetic root.
    #[must_use]
    pub fn to_document(&self) -> TreeDocument {
        TreeDocument::new(self.roots.clone())
    }

    /// Serialize the forest under the synthetic root group.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_value(&self, mode: CodecMode) -> serde_json::Result<Value> {
        let root = RootRef {
            kind: GROUP_TYPE,
            id: ROOT_ID,
            name: ROOT_NAME,
            components: &self.roots,
        };
        let mut value = serde_json::to_value(root)?;
        if mode == CodecMode::Strip {
            strip_editor_fields(&mut value);
        }
        Ok(value)
    }
}

/// Borrowed view of the synthetic root for serialization.
#[derive(Serialize)]
struct RootRef<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    id: &'a str,
    name: &'a str,
    components: &'a [Component],
}

/// Serialized component forest: `{type, id, name, components: [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    /// Type tag of the synthetic root.
    #[serde(rename = "type", default = "TreeDocument::default_kind")]
    pub kind: String,
    /// Identifier of the synthetic root.
    #[serde(default = "TreeDocument::default_id")]
    pub id: String,
    /// Display name of the synthetic root.
    #[serde(default = "TreeDocument::default_name")]
    pub name: String,
    /// Root-level components in paint order.
    #[serde(default)]
    pub components: Vec<Component>,
}

impl TreeDocument {
    /// Wrap root components under the synthetic root.
    #[must_use]
    pub fn new(components: Vec<Component>) -> Self {
        Self {
            kind: Self::default_kind(),
            id: Self::default_id(),
            name: Self::default_name(),
            components,
        }
    }

    fn default_kind() -> String {
        GROUP_TYPE.to_string()
    }

    fn default_id() -> String {
        ROOT_ID.to_string()
    }

    fn default_name() -> String {
        ROOT_NAME.to_string()
    }
}

impl Default for TreeDocument {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
