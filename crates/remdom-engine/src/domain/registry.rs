//! The element registry: string identifier → live node handle.
//!
//! Single source of truth for "which nodes are addressable" by the remote
//! controller.  Invariant: at most one live node per identifier.  Inserting a
//! duplicate is rejected — reported, not fatal — and the original mapping is
//! preserved.
//!
//! The registry holds non-owning [`NodeId`] references; node lifetime belongs
//! to the document tree.  Eviction during subtree teardown therefore goes
//! through [`ElementRegistry::evict_nodes`], keyed on the nodes actually torn
//! down rather than on their `id` attributes: an attribute can be rewritten
//! after registration without moving the registry entry, and a node that lost
//! a duplicate-id race must not evict the winner's mapping on its way out.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::domain::document::NodeId;

/// Errors produced by registry mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The identifier is already mapped to a live node.
    #[error("duplicate element id: {0}")]
    Duplicate(String),
}

/// Process-wide (per engine instance) identifier → node mapping.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    entries: HashMap<String, NodeId>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the mapping if `id` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] when `id` is already mapped; the
    /// existing mapping is left untouched.
    pub fn register(&mut self, id: &str, node: NodeId) -> Result<(), RegistryError> {
        if self.entries.contains_key(id) {
            return Err(RegistryError::Duplicate(id.to_string()));
        }
        self.entries.insert(id.to_string(), node);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.entries.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Removes the mapping; no error if absent.
    pub fn unregister(&mut self, id: &str) {
        self.entries.remove(id);
    }

    /// Removes every entry pointing at one of the `removed` nodes, whatever
    /// identifier it is held under.
    ///
    /// Used during subtree teardown: eviction follows the registry's own
    /// keys, so entries survive `id`-attribute rewrites, and a duplicate-id
    /// loser (never registered) cannot evict the surviving node's entry.
    pub fn evict_nodes(&mut self, removed: &HashSet<NodeId>) {
        self.entries.retain(|_, node| !removed.contains(node));
    }

    /// Empties the registry; used on engine close.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
