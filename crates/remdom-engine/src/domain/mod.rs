//! Domain layer: the document tree and the element registry.
//!
//! Ownership model: the tree owns its nodes (a parent retains its children in
//! the arena); the registry holds non-owning [`document::NodeId`] lookups.
//! Tearing down a subtree therefore has to evict every descendant's registry
//! entry explicitly — the registry never learns about tree mutations on its
//! own.

pub mod document;
pub mod registry;
