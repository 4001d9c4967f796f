//! Schema registry mapping field paths to collection specs and policies.

use std::collections::HashMap;

use super::types::{CollectionSpec, MergePolicy};

/// Registry of entity collections and per-field merge policies.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    collections: HashMap<String, CollectionSpec>,
    policies: HashMap<String, MergePolicy>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    ///
    /// With no collections registered, every array of objects is treated as
    /// an `id`-keyed collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity collection.
    pub fn register(&mut self, spec: CollectionSpec) {
        self.collections.insert(spec.path.clone(), spec);
    }

    /// Override the merge policy of a field.
    pub fn set_policy(&mut self, path: impl Into<String>, policy: MergePolicy) {
        self.policies.insert(path.into(), policy);
    }

    /// Get the collection spec for a path.
    #[must_use]
    pub fn collection(&self, path: &str) -> Option<&CollectionSpec> {
        self.collections.get(path)
    }

    /// Get the merge policy for a path, falling back to [`MergePolicy::Merge`].
    #[must_use]
    pub fn policy(&self, path: &str) -> &MergePolicy {
        static DEFAULT: MergePolicy = MergePolicy::Merge;
        self.policies.get(path).unwrap_or(&DEFAULT)
    }

    /// Check if a path is a registered entity collection.
    #[must_use]
    pub fn is_collection(&self, path: &str) -> bool {
        self.collections.contains_key(path)
    }

    /// Registered collection paths, sorted.
    #[must_use]
    pub fn collection_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.collections.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}
