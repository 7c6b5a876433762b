//! The DOM command engine: lifecycle and the six command handlers.
//!
//! Each handler receives a decoded [`DomCommand`] and the dispatcher's
//! outbound channel.  All handlers are synchronous and side-effecting; none
//! block or suspend.  Commands are processed strictly in arrival order on the
//! single dispatch thread — replies and event notifications may interleave
//! with new inbound commands, so `replyId` correlation is the only ordering
//! contract.
//!
//! Failure taxonomy (one-shot notifications, never fatal to the host):
//!
//! - duplicate identifier at create → reported, node still created/attached;
//! - unknown identifier on remove/update/query/invoke → reported, no state
//!   change, no reply for reply-bearing commands;
//! - unknown method on invoke → reported, no reply.

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use remdom_core::protocol::commands::{CreateSpec, DomCommand};
use remdom_core::protocol::events::{EventDetail, HostEvent};
use remdom_core::protocol::outbound::Reply;

use crate::application::event_bridge::EventBridge;
use crate::application::methods::{self, Method};
use crate::application::outbound::OutboundChannel;
use crate::domain::document::{Document, NodeId, Rect};
use crate::domain::registry::{ElementRegistry, RegistryError};

/// Semantic command failures, reported to the controller over the error
/// channel.  None of these abort anything beyond the failing command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A create command supplied an `id` attribute that is already taken.
    #[error("duplicate element id: {0}")]
    DuplicateId(String),

    /// A command referenced an identifier with no registry entry.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// invoke-method named a capability the target node does not have.
    #[error("method not found: {method} on <{tag}>")]
    MethodNotFound { tag: String, method: String },
}

impl From<RegistryError> for EngineError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Duplicate(id) => EngineError::DuplicateId(id),
        }
    }
}

/// The host-side DOM proxy: document tree, element registry, event bridge,
/// and the command handlers that tie them together.
///
/// All state is instance-owned; independent engines never collide.  The
/// dispatcher drives the lifecycle: [`DomEngine::open`] when the connector
/// comes up (pre-registers the `"body"`/`"head"` root mappings),
/// [`DomEngine::close`] when it goes away (drains registry and listener
/// table).
#[derive(Debug)]
pub struct DomEngine {
    document: Document,
    registry: ElementRegistry,
    bridge: EventBridge,
    focused: Option<NodeId>,
}

impl DomEngine {
    /// Builds a closed engine; call [`DomEngine::open`] before handling
    /// commands.
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            registry: ElementRegistry::new(),
            bridge: EventBridge::new(),
            focused: None,
        }
    }

    /// Connector-opened hook: resets to a fresh tree and pre-registers the
    /// well-known root container mappings.
    pub fn open(&mut self) {
        self.document = Document::new();
        self.registry.clear();
        self.bridge.clear();
        self.focused = None;
        // A freshly cleared registry cannot collide on these.
        let body = self.document.body();
        let head = self.document.head();
        let _ = self.registry.register("body", body);
        let _ = self.registry.register("head", head);
        debug!("engine opened; root container mappings registered");
    }

    /// Connector-closed hook: drains the registry and the listener table.
    pub fn close(&mut self) {
        self.registry.clear();
        self.bridge.clear();
        self.focused = None;
        debug!("engine closed; registry and listener table drained");
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Resolves a registry identifier without reporting; host-side helper.
    pub fn resolve_id(&self, id: &str) -> Option<NodeId> {
        self.registry.lookup(id)
    }

    /// The node currently holding focus, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Host-side hook: supplies the layout rectangle for a registered node.
    /// Returns `false` when the id does not resolve.
    pub fn set_geometry(&mut self, id: &str, rect: Rect) -> bool {
        match self.registry.lookup(id) {
            Some(node) => {
                self.document.set_geometry(node, rect);
                true
            }
            None => false,
        }
    }

    /// Routes one decoded command to its handler.
    pub fn handle<S: OutboundChannel>(&mut self, command: DomCommand, sink: &mut S) {
        debug!(command = command.command_type(), "handling command");
        match command {
            DomCommand::CreateDom(spec) => {
                self.build_node(&spec, None, sink);
            }
            DomCommand::RemoveDom { id } => self.handle_remove(&id, sink),
            DomCommand::UpdateDom {
                id,
                attributes,
                parent,
                text_content,
                listen_events,
                stop_listen_events,
            } => self.handle_update(
                &id,
                attributes.as_ref(),
                parent.as_deref(),
                text_content.as_deref(),
                listen_events.as_deref(),
                stop_listen_events.as_deref(),
                sink,
            ),
            DomCommand::GetBoundingRect { id, reply_id } => {
                self.handle_bounding_rect(&id, reply_id, sink)
            }
            DomCommand::ReadProps { id, props, reply_id } => {
                self.handle_read_props(&id, &props, reply_id, sink)
            }
            DomCommand::InvokeMethod {
                id,
                method_name,
                args,
                reply_id,
            } => self.handle_invoke(&id, &method_name, args.unwrap_or_default(), reply_id, sink),
        }
    }

    /// Host-side entry point: a native event fired on the node registered
    /// under `id`.  Forwarded through the event bridge; silently ignored when
    /// the id does not resolve (the host raced a removal, not a protocol
    /// error).
    pub fn deliver_event<S: OutboundChannel>(
        &self,
        id: &str,
        event: &HostEvent,
        sink: &mut S,
    ) {
        let Some(node) = self.registry.lookup(id) else {
            debug!(id, event_type = %event.event_type, "event for unknown id dropped");
            return;
        };
        self.bridge.deliver(&self.document, node, event, sink);
    }

    // ── create ────────────────────────────────────────────────────────────────

    /// Builds a node per `spec`: attributes (registering an `id`), children
    /// (recursively, appended to this node), attachment, text, listeners —
    /// in that order.  Returns the constructed node for recursive
    /// child-attachment; create itself never replies.
    fn build_node<S: OutboundChannel>(
        &mut self,
        spec: &CreateSpec,
        explicit_parent: Option<NodeId>,
        sink: &mut S,
    ) -> NodeId {
        let node = self.document.create(&spec.element);

        if let Some(attributes) = &spec.attributes {
            for (name, value) in attributes {
                // A null value means "skip" at creation time.
                let Some(value) = value else { continue };
                self.document.set_attribute(node, name, value);
                if name == "id" {
                    if let Err(err) = self.registry.register(value, node) {
                        // Reported, not fatal: the node is still created and
                        // still inserted into the tree, just not addressable
                        // under the colliding id.
                        self.report(&EngineError::from(err), sink);
                    }
                }
            }
        }

        if let Some(children) = &spec.children {
            for child in children {
                self.build_node(child, Some(node), sink);
            }
        }

        match explicit_parent {
            // Nested children always attach to the node that declared them.
            Some(parent) => self.document.append_child(parent, node),
            None => {
                if let Some(parent_id) = &spec.parent {
                    match self.registry.lookup(parent_id) {
                        Some(parent) => self.document.append_child(parent, node),
                        None => debug!(
                            parent = %parent_id,
                            "create parent does not resolve; node left unattached"
                        ),
                    }
                } else if !spec.is_independent() {
                    let body = self.document.body();
                    self.document.append_child(body, node);
                }
            }
        }

        if let Some(text) = &spec.text_content {
            // Overwrites any text set during child construction.
            self.document.set_text(node, text);
        }

        if let Some(events) = &spec.listen_events {
            for event_type in events {
                self.bridge.listen(node, event_type);
            }
        }

        node
    }

    // ── remove ────────────────────────────────────────────────────────────────

    fn handle_remove<S: OutboundChannel>(&mut self, id: &str, sink: &mut S) {
        let Some(target) = self.resolve_or_report(id, sink) else {
            return;
        };
        // The seeded containers anchor the tree (and the default attachment
        // point); removing them is skipped, not executed.
        if target == self.document.root()
            || target == self.document.body()
            || target == self.document.head()
        {
            debug!(id, "remove of seeded container skipped");
            return;
        }
        self.document.detach(target);
        self.teardown(target);
    }

    /// Tears down a detached subtree with an explicit worklist.
    ///
    /// The live child list is re-read after every detach rather than
    /// snapshotted up front, so the traversal stays correct while it mutates
    /// the structure it walks.  Every node sheds its listener subscriptions
    /// before leaving the arena, and registry eviction runs once at the end,
    /// keyed on the removed nodes themselves — no dangling identifiers, no
    /// abandoned listeners, even when an `id` attribute was rewritten after
    /// registration.
    fn teardown(&mut self, root: NodeId) {
        let mut work = vec![root];
        let mut removed = HashSet::new();
        while let Some(node) = work.pop() {
            removed.insert(node);
            self.bridge.release_all(node);
            if self.focused == Some(node) {
                self.focused = None;
            }
            while let Some(child) = self.document.first_child(node) {
                self.document.detach(child);
                work.push(child);
            }
            self.document.drop_node(node);
        }
        self.registry.evict_nodes(&removed);
    }

    // ── update ────────────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    fn handle_update<S: OutboundChannel>(
        &mut self,
        id: &str,
        attributes: Option<&remdom_core::protocol::commands::AttributePatch>,
        parent: Option<&str>,
        text_content: Option<&str>,
        listen_events: Option<&[String]>,
        stop_listen_events: Option<&[String]>,
        sink: &mut S,
    ) {
        let Some(node) = self.resolve_or_report(id, sink) else {
            return;
        };

        // Sub-operations are independent and apply in a fixed order:
        // attributes, reparent, text, listener adds, listener removes.
        if let Some(attributes) = attributes {
            for (name, value) in attributes {
                match value {
                    Some(value) => self.document.set_attribute(node, name, value),
                    None => self.document.remove_attribute(node, name),
                }
            }
        }

        if let Some(parent_id) = parent {
            match self.registry.lookup(parent_id) {
                // Attaching a node inside its own subtree would close a
                // parent-link cycle; skipped like an unresolvable target.
                Some(parent) if parent == node || self.document.is_ancestor(node, parent) => {
                    debug!(parent = %parent_id, "reparent into own subtree; skipped")
                }
                Some(parent) => self.document.append_child(parent, node),
                // Reparent is a no-op, not an error, when the target does
                // not resolve.
                None => debug!(parent = %parent_id, "update parent does not resolve; reparent skipped"),
            }
        }

        if let Some(text) = text_content {
            // Absent means "leave unchanged" and never reaches this branch;
            // an empty string clears the text.
            self.document.set_text(node, text);
        }

        if let Some(events) = listen_events {
            for event_type in events {
                self.bridge.listen(node, event_type);
            }
        }
        if let Some(events) = stop_listen_events {
            for event_type in events {
                self.bridge.stop_listen(node, event_type);
            }
        }
    }

    // ── queries ───────────────────────────────────────────────────────────────

    fn handle_bounding_rect<S: OutboundChannel>(
        &mut self,
        id: &str,
        reply_id: String,
        sink: &mut S,
    ) {
        let Some(node) = self.resolve_or_report(id, sink) else {
            return;
        };
        let reply = match self.document.bounding_rect(node) {
            Some(rect) => Reply::new(reply_id, encode_value(&rect)),
            // Geometry unavailable (detached / never laid out): empty data.
            None => Reply::empty(reply_id),
        };
        sink.reply(reply);
    }

    fn handle_read_props<S: OutboundChannel>(
        &mut self,
        id: &str,
        props: &[String],
        reply_id: String,
        sink: &mut S,
    ) {
        let Some(node) = self.resolve_or_report(id, sink) else {
            return;
        };
        // Reply order matches request order exactly, one-to-one.
        let values: Vec<Value> = props.iter().map(|p| self.read_prop(node, p)).collect();
        sink.reply(Reply::new(reply_id, encode_value(&values)));
    }

    /// Reads one named property off a node, `null` for names outside the
    /// documented surface: `tagName`, `id`, `className`, `value`,
    /// `textContent`, `childElementCount`.
    fn read_prop(&self, node: NodeId, name: &str) -> Value {
        let Some(n) = self.document.node(node) else {
            return Value::Null;
        };
        match name {
            "tagName" => Value::String(n.tag().to_ascii_uppercase()),
            "id" => Value::String(n.attribute("id").unwrap_or_default().to_string()),
            "className" => Value::String(n.attribute("class").unwrap_or_default().to_string()),
            "value" => Value::String(n.attribute("value").unwrap_or_default().to_string()),
            "textContent" => Value::String(n.text().to_string()),
            "childElementCount" => Value::from(n.children().len()),
            _ => Value::Null,
        }
    }

    // ── invoke ────────────────────────────────────────────────────────────────

    fn handle_invoke<S: OutboundChannel>(
        &mut self,
        id: &str,
        method_name: &str,
        args: Vec<Value>,
        reply_id: String,
        sink: &mut S,
    ) {
        let Some(node) = self.resolve_or_report(id, sink) else {
            return;
        };
        let tag = self
            .document
            .node(node)
            .map(|n| n.tag().to_string())
            .unwrap_or_default();
        let Some(method) = methods::resolve(&tag, method_name) else {
            self.report(
                &EngineError::MethodNotFound {
                    tag,
                    method: method_name.to_string(),
                },
                sink,
            );
            return;
        };
        let reply = match self.invoke(node, method, &args, sink) {
            Some(result) => Reply::new(reply_id, encode_value(&result)),
            None => Reply::empty(reply_id),
        };
        sink.reply(reply);
    }

    fn invoke<S: OutboundChannel>(
        &mut self,
        node: NodeId,
        method: Method,
        args: &[Value],
        sink: &mut S,
    ) -> Option<Value> {
        match method {
            Method::Focus => {
                self.focused = Some(node);
                None
            }
            Method::Blur => {
                if self.focused == Some(node) {
                    self.focused = None;
                }
                None
            }
            Method::Select | Method::ScrollIntoView => None,
            Method::Click => {
                // Synthesize a pointer event at the node's geometry center;
                // delivered like any native click, so the controller only
                // hears about it if it is listening.
                let (x, y) = self
                    .document
                    .bounding_rect(node)
                    .map(|r| r.center())
                    .unwrap_or((0.0, 0.0));
                let event = HostEvent::new("click", EventDetail::Pointer { x, y });
                self.bridge.deliver(&self.document, node, &event, sink);
                None
            }
            Method::GetAttribute => {
                let name = args.first().and_then(Value::as_str)?;
                self.document
                    .node(node)
                    .and_then(|n| n.attribute(name))
                    .map(|v| Value::String(v.to_string()))
            }
            Method::HasAttribute => {
                let has = args
                    .first()
                    .and_then(Value::as_str)
                    .map(|name| {
                        self.document
                            .node(node)
                            .map(|n| n.has_attribute(name))
                            .unwrap_or(false)
                    })
                    .unwrap_or(false);
                Some(Value::Bool(has))
            }
        }
    }

    // ── error reporting ───────────────────────────────────────────────────────

    fn resolve_or_report<S: OutboundChannel>(&mut self, id: &str, sink: &mut S) -> Option<NodeId> {
        match self.registry.lookup(id) {
            Some(node) => Some(node),
            None => {
                self.report(&EngineError::NodeNotFound(id.to_string()), sink);
                None
            }
        }
    }

    fn report<S: OutboundChannel>(&self, err: &EngineError, sink: &mut S) {
        warn!(error = %err, "command failed");
        sink.send_error(&err.to_string());
    }
}

impl Default for DomEngine {
    fn default() -> Self {
        Self::new()
    }
}

// Serialization of replies over plain JSON values cannot fail in practice;
// an empty data string is the protocol's "no value" fallback.
fn encode_value<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
