//! Infrastructure layer: channel-backed outbound frame plumbing.
//!
//! The engine itself is transport-agnostic; this module supplies the
//! [`frame_channel::FrameChannel`] adapter that dispatchers embed to ship
//! [`remdom_core::OutboundFrame`] values to an async writer task.

pub mod frame_channel;

pub use frame_channel::FrameChannel;
