//! Kind registry for looking up link kind handlers by name.
//!
//! The registry is populated once at startup (built-in kinds plus anything a
//! host or plugin registers) and then passed by reference into normalization
//! and validation. Iteration follows registration order.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::kind::{ElementKind, InputKind, KindError, KindHandler};

/// Ordered mapping from kind name to its handler
pub type KindMap = IndexMap<String, Arc<dyn KindHandler>>;

/// Registry of available link kinds
#[derive(Clone, Default)]
pub struct KindRegistry {
    kinds: KindMap,
}

impl KindRegistry {
    /// Create a new empty kind registry
    pub fn new() -> Self {
        Self {
            kinds: IndexMap::new(),
        }
    }

    /// Registry holding the built-in kinds, in the order they are offered to editors:
    /// `url`, `custom`, `email`, `tel`, `entry`, `asset`, `category`.
    pub fn builtin() -> Result<Self, KindError> {
        let mut registry = Self::new();
        registry.register("url", Arc::new(InputKind::url()?));
        registry.register("custom", Arc::new(InputKind::custom()));
        registry.register("email", Arc::new(InputKind::email()?));
        registry.register("tel", Arc::new(InputKind::tel()?));
        registry.register("entry", Arc::new(ElementKind::new("Entry")));
        registry.register("asset", Arc::new(ElementKind::new("Asset")));
        registry.register("category", Arc::new(ElementKind::new("Category")));
        Ok(registry)
    }

    /// Register a kind handler.
    ///
    /// Registering a name twice replaces the handler but keeps the name's
    /// original position. The replaced handler is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use typed_link::{InputKind, KindRegistry};
    ///
    /// let mut registry = KindRegistry::new();
    /// registry.register("site", Arc::new(InputKind::new("Site path")));
    /// assert!(registry.has_kind("site"));
    /// ```
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn KindHandler>,
    ) -> Option<Arc<dyn KindHandler>> {
        let name = name.into();
        let previous = self.kinds.insert(name.clone(), handler);
        if previous.is_some() {
            tracing::warn!("Kind '{}' registered twice, replacing previous handler", name);
        }
        previous
    }

    /// Look up the handler for a kind
    pub fn get(&self, name: &str) -> Option<&Arc<dyn KindHandler>> {
        self.kinds.get(name)
    }

    /// Check if a kind is registered
    pub fn has_kind(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// All registered kinds in registration order
    pub fn list_kinds(&self) -> &KindMap {
        &self.kinds
    }

    pub fn kind_names(&self) -> Vec<&str> {
        self.kinds.keys().map(String::as_str).collect()
    }

    /// Display name per kind, in registration order
    pub fn display_names(&self) -> IndexMap<String, String> {
        self.kinds
            .iter()
            .map(|(name, handler)| (name.clone(), handler.display_name().to_string()))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl std::fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KindRegistry")
            .field("kinds", &self.kind_names())
            .finish()
    }
}
