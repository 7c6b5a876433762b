//! The dispatcher-facing outbound contract.
//!
//! The engine never talks to a connector directly; it hands frames to
//! whatever implements [`OutboundChannel`].  All three primitives are
//! fire-and-forget and must not block — the engine runs on the single
//! dispatch thread and a blocking send would stall every in-flight command.

use remdom_core::protocol::outbound::{OutboundFrame, Reply};

/// Reply / error / notify primitives the dispatcher provides to the engine.
///
/// Implementations: [`crate::infrastructure::frame_channel::FrameChannel`]
/// for production wiring, [`RecordingChannel`] for tests.
#[cfg_attr(test, mockall::automock)]
pub trait OutboundChannel {
    /// Sends an asynchronous notification tagged with `subject`.
    fn send_message(&mut self, subject: &str, data: &str);

    /// Sends a one-shot, human-readable error notification.
    fn send_error(&mut self, message: &str);

    /// Sends the correlated response to a reply-bearing command.
    fn reply(&mut self, reply: Reply);
}

/// An [`OutboundChannel`] that records every frame in memory.
///
/// Useful wherever a test wants to assert on the exact outbound traffic a
/// sequence of commands produced.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    /// Every frame sent, in order.
    pub frames: Vec<OutboundFrame>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded replies, in order.
    pub fn replies(&self) -> Vec<&Reply> {
        self.frames
            .iter()
            .filter_map(|f| match f {
                OutboundFrame::Reply(reply) => Some(reply),
                _ => None,
            })
            .collect()
    }

    /// All recorded error messages, in order.
    pub fn errors(&self) -> Vec<&str> {
        self.frames
            .iter()
            .filter_map(|f| match f {
                OutboundFrame::Error { message } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All recorded event notifications as `(subject, data)` pairs, in order.
    pub fn events(&self) -> Vec<(&str, &str)> {
        self.frames
            .iter()
            .filter_map(|f| match f {
                OutboundFrame::Event { subject, data } => {
                    Some((subject.as_str(), data.as_str()))
                }
                _ => None,
            })
            .collect()
    }
}

impl OutboundChannel for RecordingChannel {
    fn send_message(&mut self, subject: &str, data: &str) {
        self.frames.push(OutboundFrame::Event {
            subject: subject.to_string(),
            data: data.to_string(),
        });
    }

    fn send_error(&mut self, message: &str) {
        self.frames.push(OutboundFrame::Error {
            message: message.to_string(),
        });
    }

    fn reply(&mut self, reply: Reply) {
        self.frames.push(OutboundFrame::Reply(reply));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_channel_preserves_frame_order() {
        let mut channel = RecordingChannel::new();
        channel.send_message("dispatch:click", "{}");
        channel.send_error("boom");
        channel.reply(Reply::new("r1", "42"));

        assert_eq!(channel.frames.len(), 3);
        assert_eq!(channel.events(), vec![("dispatch:click", "{}")]);
        assert_eq!(channel.errors(), vec!["boom"]);
        assert_eq!(channel.replies()[0].reply_id, "r1");
    }
}
