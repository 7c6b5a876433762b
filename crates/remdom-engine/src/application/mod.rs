//! Application layer: command handling, event bridging, method dispatch.
//!
//! Everything here is synchronous and side-effecting over the domain state;
//! nothing blocks or suspends.  All outbound traffic goes through the
//! [`outbound::OutboundChannel`] collaborator trait, which the external
//! dispatcher implements (see `infrastructure` for the channel-backed one).

pub mod engine;
pub mod event_bridge;
pub mod methods;
pub mod outbound;

pub use engine::{DomEngine, EngineError};
pub use event_bridge::EventBridge;
pub use outbound::{OutboundChannel, RecordingChannel};
