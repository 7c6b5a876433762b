//! The event bridge: per-(node, event-type) listener management.
//!
//! One subscription per (node, event-type) pair, full stop.  Re-listening is
//! a no-op, so replayed create/update commands never produce duplicate
//! dispatch storms, and the bookkeeping stays O(1) per event instead of
//! accumulating closures.
//!
//! Delivery converts the host's native event into its minimal wire payload
//! exactly once, at this boundary, then forwards it tagged with a
//! `"dispatch:" + eventType` subject so the controller can separate event
//! streams by type.

use std::collections::HashSet;

use remdom_core::protocol::events::{EventDetail, HostEvent};
use remdom_core::protocol::outbound::dispatch_subject;
use tracing::debug;

use crate::application::outbound::OutboundChannel;
use crate::domain::document::{Document, NodeId};

/// Listener table keyed by (node, event-type).
#[derive(Debug, Default)]
pub struct EventBridge {
    listeners: HashSet<(NodeId, String)>,
}

impl EventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `node` to `event_type`.  Returns `true` when a new
    /// subscription was created; re-subscribing an existing pair is a no-op.
    pub fn listen(&mut self, node: NodeId, event_type: &str) -> bool {
        self.listeners.insert((node, event_type.to_string()))
    }

    /// Detaches the subscription for the pair; no-op if absent.
    pub fn stop_listen(&mut self, node: NodeId, event_type: &str) {
        self.listeners.remove(&(node, event_type.to_string()));
    }

    /// Releases every subscription held by `node`.
    ///
    /// Called during node removal so listener bookkeeping is dropped
    /// explicitly rather than abandoned.
    pub fn release_all(&mut self, node: NodeId) {
        self.listeners.retain(|(n, _)| *n != node);
    }

    pub fn is_listening(&self, node: NodeId, event_type: &str) -> bool {
        self.listeners.contains(&(node, event_type.to_string()))
    }

    /// Number of live subscriptions across all nodes.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Drops every subscription; used on engine close.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Delivers a native event fired on `node`.
    ///
    /// Silently ignored unless the (node, event-type) pair is subscribed.
    /// For text-input events the payload is the node's current `value`
    /// attribute, read here — once — at the projection boundary.
    pub fn deliver<S: OutboundChannel>(
        &self,
        document: &Document,
        node: NodeId,
        event: &HostEvent,
        sink: &mut S,
    ) {
        if !self.is_listening(node, &event.event_type) {
            debug!(event_type = %event.event_type, "event on unsubscribed node ignored");
            return;
        }
        let input_value = match event.detail {
            EventDetail::TextInput => document.node(node).and_then(|n| n.attribute("value")),
            _ => None,
        };
        let data = event.payload_data(input_value);
        sink.send_message(&dispatch_subject(&event.event_type), &data);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
