//! Inbound command types for the controller-facing JSON protocol.
//!
//! Every command is a JSON object with a `"type"` field that identifies the
//! variant; all other fields are flattened into the same object.  Field names
//! are camelCase on the wire.  For example:
//!
//! ```json
//! {"type":"create-dom","element":"div","attributes":{"id":"a"}}
//! {"type":"update-dom","id":"a","textContent":""}
//! {"type":"read-props","id":"a","props":["tagName","id"],"replyId":"r1"}
//! ```
//!
//! Serde's `#[serde(tag = "type")]` attribute handles the discriminant
//! automatically.
//!
//! # Optional fields
//!
//! Optionality is load-bearing for `update-dom`: a missing `textContent`
//! means "leave the text unchanged", while an explicit `""` means "clear the
//! text".  `Option<String>` preserves exactly that distinction, so handlers
//! must never collapse `None` and `Some(String::new())`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute changes carried by `create-dom` and `update-dom`.
///
/// Maps attribute name to a string value or JSON `null`.  At creation a
/// `null` value means "skip this attribute"; at update it means "remove this
/// attribute".  A `BTreeMap` keeps application order deterministic.
pub type AttributePatch = BTreeMap<String, Option<String>>;

/// Payload of a `create-dom` command.
///
/// This struct is recursive: each entry of `children` is itself a full
/// creation payload (attributes, nested children, text, listener
/// declarations), minus the `parent`/`independent` attachment fields, which
/// only apply at the top level — nested children always attach to the node
/// that declared them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpec {
    /// Tag of the node to build, e.g. `"div"` or `"input"`.
    pub element: String,

    /// Registry identifier of the node to attach under.
    ///
    /// When absent, the node attaches under the root container (`"body"`)
    /// unless `independent` is set.  When present but unresolvable, the node
    /// is created unattached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Attributes to apply; `null` values are skipped at creation.
    ///
    /// An `"id"` attribute additionally attempts registry registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttributePatch>,

    /// Child nodes to build and append, in order, before this node attaches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CreateSpec>>,

    /// Visible text content; overwrites any text set during child
    /// construction (last write wins).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// When `true`, the node is deliberately left unattached; the controller
    /// will attach it later (or never) via `update-dom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub independent: Option<bool>,

    /// Event types to start listening for once the node exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen_events: Option<Vec<String>>,
}

impl CreateSpec {
    /// Returns a minimal creation payload for `element` with every optional
    /// field absent.
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            parent: None,
            attributes: None,
            children: None,
            text_content: None,
            independent: None,
            listen_events: None,
        }
    }

    /// Whether the node was explicitly marked independent (detached).
    pub fn is_independent(&self) -> bool {
        self.independent.unwrap_or(false)
    }
}

/// All commands a controller can send, discriminated by the `"type"` field.
///
/// Reply-bearing variants carry a caller-chosen `replyId` correlation token
/// that is echoed back unchanged in the matching [`super::outbound::Reply`].
/// Correlation tokens — not arrival order — are the only thing a controller
/// may rely on to match a reply to its originating request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomCommand {
    /// Build a node (and, recursively, its children). Fire-and-forget.
    #[serde(rename = "create-dom")]
    CreateDom(CreateSpec),

    /// Tear down the node registered under `id` together with its whole
    /// subtree. Fire-and-forget.
    #[serde(rename = "remove-dom")]
    RemoveDom {
        /// Registry identifier of the subtree root to remove.
        id: String,
    },

    /// Mutate an existing node.  Sub-operations apply in a fixed order:
    /// attributes, reparent, text, listener adds, listener removes.
    #[serde(rename = "update-dom", rename_all = "camelCase")]
    UpdateDom {
        /// Registry identifier of the node to update.
        id: String,
        /// Attribute changes; `null` removes, any other value sets.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attributes: Option<AttributePatch>,
        /// New parent identifier; an unresolvable parent makes the reparent
        /// a silent no-op, not an error.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<String>,
        /// Absent = leave unchanged; `""` = clear the text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text_content: Option<String>,
        /// Event types to additionally subscribe.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        listen_events: Option<Vec<String>>,
        /// Event types to unsubscribe.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stop_listen_events: Option<Vec<String>>,
    },

    /// Query the node's layout rectangle.  Replies with the JSON-encoded
    /// rectangle, or empty data when geometry is unavailable.
    #[serde(rename = "get-bounding-rect", rename_all = "camelCase")]
    GetBoundingRect {
        id: String,
        /// Correlation token echoed back in the reply.
        reply_id: String,
    },

    /// Read an ordered list of named properties off the node.  The reply
    /// list's order matches `props` exactly, one-to-one, with JSON `null`
    /// for names the node does not expose.
    #[serde(rename = "read-props", rename_all = "camelCase")]
    ReadProps {
        id: String,
        /// Property names to read, in reply order.
        props: Vec<String>,
        reply_id: String,
    },

    /// Invoke a named method on the node with positional arguments.
    #[serde(rename = "invoke-method", rename_all = "camelCase")]
    InvokeMethod {
        id: String,
        /// Name of the method to look up on the node.
        method_name: String,
        /// Positional arguments; defaults to none.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        args: Option<Vec<serde_json::Value>>,
        reply_id: String,
    },
}

impl DomCommand {
    /// Returns the wire discriminant for this command.
    pub fn command_type(&self) -> &'static str {
        match self {
            DomCommand::CreateDom(_) => "create-dom",
            DomCommand::RemoveDom { .. } => "remove-dom",
            DomCommand::UpdateDom { .. } => "update-dom",
            DomCommand::GetBoundingRect { .. } => "get-bounding-rect",
            DomCommand::ReadProps { .. } => "read-props",
            DomCommand::InvokeMethod { .. } => "invoke-method",
        }
    }

    /// Whether the sender expects exactly one correlated reply frame.
    pub fn is_reply_bearing(&self) -> bool {
        matches!(
            self,
            DomCommand::GetBoundingRect { .. }
                | DomCommand::ReadProps { .. }
                | DomCommand::InvokeMethod { .. }
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dom_deserializes_minimal_payload() {
        let json = r#"{"type":"create-dom","element":"div"}"#;
        let cmd: DomCommand = serde_json::from_str(json).unwrap();
        match cmd {
            DomCommand::CreateDom(spec) => {
                assert_eq!(spec.element, "div");
                assert!(spec.parent.is_none());
                assert!(spec.attributes.is_none());
                assert!(!spec.is_independent());
            }
            other => panic!("expected CreateDom, got {:?}", other),
        }
    }

    #[test]
    fn test_create_dom_deserializes_nested_children() {
        let json = r#"{
            "type": "create-dom",
            "element": "div",
            "attributes": {"id": "a", "hidden": null},
            "children": [
                {"element": "span", "textContent": "hi", "listenEvents": ["click"]}
            ]
        }"#;
        let cmd: DomCommand = serde_json::from_str(json).unwrap();
        match cmd {
            DomCommand::CreateDom(spec) => {
                let attrs = spec.attributes.unwrap();
                assert_eq!(attrs.get("id"), Some(&Some("a".to_string())));
                // null attribute values survive decoding; the engine skips them
                assert_eq!(attrs.get("hidden"), Some(&None));

                let children = spec.children.unwrap();
                assert_eq!(children.len(), 1);
                assert_eq!(children[0].element, "span");
                assert_eq!(children[0].text_content.as_deref(), Some("hi"));
                assert_eq!(
                    children[0].listen_events.as_deref(),
                    Some(&["click".to_string()][..])
                );
            }
            other => panic!("expected CreateDom, got {:?}", other),
        }
    }

    #[test]
    fn test_update_dom_distinguishes_absent_from_empty_text() {
        let absent: DomCommand =
            serde_json::from_str(r#"{"type":"update-dom","id":"a"}"#).unwrap();
        let empty: DomCommand =
            serde_json::from_str(r#"{"type":"update-dom","id":"a","textContent":""}"#).unwrap();

        match absent {
            DomCommand::UpdateDom { text_content, .. } => assert_eq!(text_content, None),
            other => panic!("expected UpdateDom, got {:?}", other),
        }
        match empty {
            DomCommand::UpdateDom { text_content, .. } => {
                assert_eq!(text_content, Some(String::new()));
            }
            other => panic!("expected UpdateDom, got {:?}", other),
        }
    }

    #[test]
    fn test_update_dom_null_attribute_means_removal() {
        let json = r#"{"type":"update-dom","id":"a","attributes":{"class":null,"title":"t"}}"#;
        let cmd: DomCommand = serde_json::from_str(json).unwrap();
        match cmd {
            DomCommand::UpdateDom { attributes, .. } => {
                let attrs = attributes.unwrap();
                assert_eq!(attrs.get("class"), Some(&None));
                assert_eq!(attrs.get("title"), Some(&Some("t".to_string())));
            }
            other => panic!("expected UpdateDom, got {:?}", other),
        }
    }

    #[test]
    fn test_reply_bearing_commands_carry_reply_id() {
        let json = r#"{"type":"read-props","id":"x","props":["tagName","id"],"replyId":"r-7"}"#;
        let cmd: DomCommand = serde_json::from_str(json).unwrap();
        assert!(cmd.is_reply_bearing());
        match cmd {
            DomCommand::ReadProps { id, props, reply_id } => {
                assert_eq!(id, "x");
                assert_eq!(props, vec!["tagName", "id"]);
                assert_eq!(reply_id, "r-7");
            }
            other => panic!("expected ReadProps, got {:?}", other),
        }
    }

    #[test]
    fn test_invoke_method_args_default_to_none() {
        let json = r#"{"type":"invoke-method","id":"c","methodName":"focus","replyId":"r1"}"#;
        let cmd: DomCommand = serde_json::from_str(json).unwrap();
        match cmd {
            DomCommand::InvokeMethod { method_name, args, .. } => {
                assert_eq!(method_name, "focus");
                assert!(args.is_none());
            }
            other => panic!("expected InvokeMethod, got {:?}", other),
        }
    }

    #[test]
    fn test_serialization_uses_kebab_type_and_camel_case_fields() {
        let cmd = DomCommand::GetBoundingRect {
            id: "a".to_string(),
            reply_id: "r1".to_string(),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains(r#""type":"get-bounding-rect""#));
        assert!(json.contains(r#""replyId":"r1""#));
    }

    #[test]
    fn test_command_type_matches_wire_discriminant() {
        let cmd = DomCommand::RemoveDom { id: "a".to_string() };
        assert_eq!(cmd.command_type(), "remove-dom");
        assert!(!cmd.is_reply_bearing());
    }

    #[test]
    fn test_unknown_command_type_returns_error() {
        let json = r#"{"type":"explode-dom","id":"a"}"#;
        let result: Result<DomCommand, _> = serde_json::from_str(json);
        assert!(result.is_err(), "unknown type must produce a decode error");
    }

    #[test]
    fn test_missing_type_field_returns_error() {
        let json = r#"{"element":"div"}"#;
        let result: Result<DomCommand, _> = serde_json::from_str(json);
        assert!(result.is_err(), "missing 'type' field must produce a decode error");
    }
}
