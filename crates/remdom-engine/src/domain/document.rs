//! The in-memory document tree the engine mutates.
//!
//! Nodes live in an arena keyed by [`NodeId`]; tree structure is expressed
//! through parent links and ordered child lists.  The arena owns every node —
//! dropping an entry is the only way a node dies, and the engine only does
//! that after the node has been detached and its children re-homed onto the
//! teardown worklist.
//!
//! A fresh document is seeded with a root element holding `head` and `body`
//! children; `body` is the default attachment point for created nodes.
//!
//! # Geometry
//!
//! The tree itself performs no layout.  The embedding host supplies a
//! rectangle per node via [`Document::set_geometry`]; until it does — or when
//! a node is detached from the root — the geometry query reports
//! "unavailable" (`None`), which the engine answers with an empty reply
//! payload.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Opaque handle to a node in the arena.
///
/// Handles are never reused within one document's lifetime, so a stale id
/// held after removal simply fails lookups instead of aliasing a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// A node's layout rectangle in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Center point, used when synthesizing pointer events on a node.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A single element in the document tree.
#[derive(Debug, Clone)]
pub struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    geometry: Option<Rect>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
            geometry: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// The node's visible text content; empty when never set or cleared.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The arena-backed document tree.
#[derive(Debug)]
pub struct Document {
    nodes: HashMap<NodeId, Node>,
    next_id: u64,
    root: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Document {
    /// Builds a fresh tree: a root element with `head` and `body` children.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: HashMap::new(),
            next_id: 0,
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
        };
        doc.root = doc.create("html");
        doc.head = doc.create("head");
        doc.body = doc.create("body");
        doc.append_child(doc.root, doc.head);
        doc.append_child(doc.root, doc.body);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    /// The default attachment point for created nodes.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Allocates a new detached node with the given tag.
    pub fn create(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(tag));
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live nodes, including the seeded root/head/body.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.attributes.remove(name);
        }
    }

    /// Replaces the node's visible text content; `""` clears it.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.text = text.to_string();
        }
    }

    /// Appends `child` as the last child of `parent`, detaching it from its
    /// current parent first.  No-op when either node is missing, when the two
    /// are the same node, when `child` is the root, or when `parent` sits
    /// inside `child`'s own subtree (attaching there would close a
    /// parent-link cycle and break every ancestor walk).
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || child == self.root {
            return;
        }
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            return;
        }
        if self.is_ancestor(child, parent) {
            return;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
    }

    /// Unhooks `child` from its parent, leaving it (and its subtree) alive
    /// but unattached.  Idempotent.
    pub fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.nodes.get(&child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = None;
        }
    }

    /// The node's current first child, re-read from the live list.
    ///
    /// Teardown leans on this: detaching a child mutates the list, so the
    /// traversal asks again after every detach instead of iterating a
    /// snapshot.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.children.first().copied())
    }

    /// Drops a node from the arena.  The caller must have detached it and
    /// re-homed its children first; any stale links left behind would dangle.
    pub fn drop_node(&mut self, id: NodeId) {
        self.nodes.remove(&id);
    }

    /// Whether `ancestor` sits on `node`'s parent chain (strictly above it).
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(&node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    /// Whether the node is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes.get(&current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Records the host-supplied layout rectangle for a node.
    pub fn set_geometry(&mut self, id: NodeId, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.geometry = Some(rect);
        }
    }

    /// The node's layout rectangle, or `None` when geometry is unavailable
    /// (node missing, never laid out, or detached from the root).
    pub fn bounding_rect(&self, id: NodeId) -> Option<Rect> {
        if !self.is_attached(id) {
            return None;
        }
        self.nodes.get(&id).and_then(|n| n.geometry)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
