//! # remdom-core
//!
//! Wire protocol types for remdom, a runtime that lets a remote controller
//! drive a document tree inside a host page by sending discrete JSON commands
//! over an abstract connector.
//!
//! This crate is the shared foundation.  It has zero dependencies on I/O,
//! async runtimes, or any concrete transport.  It defines:
//!
//! - **`protocol::commands`** – The six inbound commands (`create-dom`,
//!   `remove-dom`, `update-dom`, `get-bounding-rect`, `read-props`,
//!   `invoke-method`), discriminated by a JSON `"type"` field.
//!
//! - **`protocol::outbound`** – The frames that travel back to the
//!   controller: correlated replies, error notifications, and event
//!   notifications tagged with a `"dispatch:<eventType>"` subject.
//!
//! - **`protocol::events`** – The host-facing event shape: a tagged union
//!   over event categories (pointer, wheel, text input, other), each
//!   projecting to its own fixed serializable payload.
//!
//! The engine crate (`remdom-engine`) consumes these types; the connector and
//! top-level frame dispatcher are external collaborators that decode inbound
//! text into [`protocol::commands::DomCommand`] and encode
//! [`protocol::outbound::OutboundFrame`] back out.

pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `remdom_core::DomCommand` instead of the full module path.
pub use protocol::commands::{AttributePatch, CreateSpec, DomCommand};
pub use protocol::events::{EventDetail, HostEvent};
pub use protocol::outbound::{dispatch_subject, OutboundFrame, Reply, DISPATCH_PREFIX};
