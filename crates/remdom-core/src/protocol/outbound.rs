//! Outbound frame types: replies, error notifications, event notifications.
//!
//! All three are fire-and-forget from the engine's point of view — it hands
//! them to the dispatcher's outbound channel and never waits.  Replies may
//! interleave with new inbound commands, so the `replyId` correlation token
//! is the only ordering guarantee a controller gets.
//!
//! # Wire shape
//!
//! ```json
//! {"type":"reply","replyId":"r1","data":"[\"DIV\",\"x\"]"}
//! {"type":"error","message":"no element registered under id: ghost"}
//! {"type":"event","subject":"dispatch:click","data":"{\"x\":10.0,\"y\":20.0}"}
//! ```

use serde::{Deserialize, Serialize};

/// Subject prefix for event notifications, so the controller can distinguish
/// event streams by type (`"dispatch:click"`, `"dispatch:input"`, …).
pub const DISPATCH_PREFIX: &str = "dispatch:";

/// Builds the notification subject for a native event type.
pub fn dispatch_subject(event_type: &str) -> String {
    format!("{DISPATCH_PREFIX}{event_type}")
}

/// The correlated response to a reply-bearing command.
///
/// `reply_id` is echoed back unchanged from the originating command; `data`
/// is a textual serialization of the result, or an empty string for
/// "no value".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    /// The caller-chosen correlation token from the originating command.
    pub reply_id: String,
    /// Textual serialization of the result; empty for "no value".
    pub data: String,
}

impl Reply {
    /// Builds a reply carrying serialized result data.
    pub fn new(reply_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            reply_id: reply_id.into(),
            data: data.into(),
        }
    }

    /// Builds a reply for "the call completed but produced no value".
    pub fn empty(reply_id: impl Into<String>) -> Self {
        Self::new(reply_id, String::new())
    }
}

/// Everything the engine can send back to the controller, discriminated by a
/// `"type"` field so the connector has a single JSON shape to encode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundFrame {
    /// Correlated response to a reply-bearing command.
    Reply(Reply),

    /// One-shot error notification; the controller owns any retry policy.
    Error {
        /// Human-readable description (for logging, not end-user display).
        message: String,
    },

    /// Asynchronous event notification from the event bridge.
    Event {
        /// `"dispatch:"` + the native event type.
        subject: String,
        /// Serialized event payload; empty for event kinds with no payload.
        data: String,
    },
}

// ── Tests ─────────────────────────────────────────────────────────────────────
