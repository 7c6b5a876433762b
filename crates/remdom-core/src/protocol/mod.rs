//! The remdom wire protocol.
//!
//! Everything that crosses the connector is JSON text.  Inbound frames decode
//! into [`commands::DomCommand`]; outbound frames encode from
//! [`outbound::OutboundFrame`].  Host UI events enter the system as
//! [`events::HostEvent`] values and leave it as event notifications.

pub mod commands;
pub mod events;
pub mod outbound;
