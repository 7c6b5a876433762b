//! Host-facing event shapes and their payload projection.
//!
//! Native UI events are heterogeneous; the wire payload is not.  Each event
//! category projects to exactly one fixed serializable shape, evaluated once
//! at the bridge boundary:
//!
//! | category    | payload                              |
//! |-------------|--------------------------------------|
//! | pointer     | `{x, y}` (client coordinates)        |
//! | wheel       | `{x, y, deltaX, deltaY, deltaZ}`     |
//! | text input  | the element's current value, plain   |
//! | other       | empty                                |
//!
//! "Other" events still fire a notification — only the payload is empty.

use serde::Serialize;

/// A native UI event observed by the embedding host.
///
/// The host constructs one of these when an event fires on a node the
/// controller is listening to, and hands it to the engine for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    /// The native event type, e.g. `"click"`, `"wheel"`, `"input"`.
    pub event_type: String,
    /// Category-specific event data.
    pub detail: EventDetail,
}

impl HostEvent {
    pub fn new(event_type: impl Into<String>, detail: EventDetail) -> Self {
        Self {
            event_type: event_type.into(),
            detail,
        }
    }

    /// Projects this event to its wire payload string.
    ///
    /// `input_value` is the target element's current value; it is consulted
    /// only for [`EventDetail::TextInput`] events.
    pub fn payload_data(&self, input_value: Option<&str>) -> String {
        match &self.detail {
            EventDetail::Pointer { x, y } => {
                serialize_payload(&PointerPayload { x: *x, y: *y })
            }
            EventDetail::Wheel {
                x,
                y,
                delta_x,
                delta_y,
                delta_z,
            } => serialize_payload(&WheelPayload {
                x: *x,
                y: *y,
                delta_x: *delta_x,
                delta_y: *delta_y,
                delta_z: *delta_z,
            }),
            // The payload is the element's value as a plain string, not a
            // JSON-quoted one.
            EventDetail::TextInput => input_value.unwrap_or_default().to_string(),
            EventDetail::Other => String::new(),
        }
    }
}

/// Category-specific data of a [`HostEvent`] — a tagged union over the event
/// categories the protocol distinguishes.
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
    /// Pointer/mouse-class events: click, mousedown, mousemove, …
    Pointer { x: f64, y: f64 },
    /// Wheel/scroll-delta events.
    Wheel {
        x: f64,
        y: f64,
        delta_x: f64,
        delta_y: f64,
        delta_z: f64,
    },
    /// Text-input events; the payload is read off the target element at
    /// projection time.
    TextInput,
    /// Every other event kind; fires with an empty payload.
    Other,
}

#[derive(Serialize)]
struct PointerPayload {
    x: f64,
    y: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WheelPayload {
    x: f64,
    y: f64,
    delta_x: f64,
    delta_y: f64,
    delta_z: f64,
}

// Serialization of these fixed shapes cannot fail; fall back to an empty
// payload rather than propagating an impossible error.
fn serialize_payload<T: Serialize>(payload: &T) -> String {
    serde_json::to_string(payload).unwrap_or_default()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
