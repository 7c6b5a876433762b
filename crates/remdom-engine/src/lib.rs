//! remdom-engine library crate.
//!
//! The host-side runtime that executes remote DOM commands: an element
//! registry mapping opaque string identifiers to live tree nodes, a set of
//! mutation/query handlers applied against that registry, and an event bridge
//! that serializes native UI events into outbound notifications.
//!
//! # Architecture
//!
//! ```text
//! Connector (external)
//!         ↕
//! Dispatcher (external; decodes frames, owns lifecycle)
//!         ↕
//! [remdom-engine]
//!   ├── domain/          Pure state: document tree, element registry
//!   ├── application/     Command handlers, event bridge, method table,
//!   │                    the OutboundChannel collaborator trait
//!   └── infrastructure/  tokio-mpsc OutboundChannel implementation
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies beyond serde (no I/O, no async).
//! - `application` depends on `domain` and `remdom-core` only.
//! - `infrastructure` additionally depends on `tokio`.
//!
//! The engine is instance-owned state with explicit `open`/`close` lifecycle
//! hooks — no globals — so independent engines (for example, in tests) never
//! collide.

/// Domain layer: document tree and element registry (no I/O).
pub mod domain;

/// Application layer: command handlers, event bridge, method dispatch.
pub mod application;

/// Infrastructure layer: channel-backed outbound frame plumbing.
pub mod infrastructure;

pub use application::engine::{DomEngine, EngineError};
pub use application::outbound::{OutboundChannel, RecordingChannel};
pub use domain::document::{Document, NodeId, Rect};
pub use domain::registry::{ElementRegistry, RegistryError};
