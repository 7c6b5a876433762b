//! Tokio-mpsc implementation of the outbound channel.
//!
//! The engine runs synchronously on the dispatch thread and must never block
//! on the transport, so outbound frames go through an unbounded channel: the
//! handler side pushes without awaiting, and a writer task owns the receiver
//! and the actual connector I/O.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use remdom_core::protocol::outbound::{OutboundFrame, Reply};

use crate::application::outbound::OutboundChannel;

/// Sender half of the outbound frame pipe.
///
/// Cheap to clone; every clone feeds the same receiver.  Once the receiver is
/// dropped (connector torn down) sends become no-ops — a command handler mid
/// flight must not fail because the connection went away underneath it.
#[derive(Debug, Clone)]
pub struct FrameChannel {
    tx: mpsc::UnboundedSender<OutboundFrame>,
}

impl FrameChannel {
    /// Creates the pipe, handing back the sender for the engine and the
    /// receiver for the writer task.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn push(&self, frame: OutboundFrame) {
        if self.tx.send(frame).is_err() {
            debug!("outbound receiver gone; frame dropped");
        }
    }
}

impl OutboundChannel for FrameChannel {
    fn send_message(&mut self, subject: &str, data: &str) {
        self.push(OutboundFrame::Event {
            subject: subject.to_string(),
            data: data.to_string(),
        });
    }

    fn send_error(&mut self, message: &str) {
        warn!(message, "reporting command error to controller");
        self.push(OutboundFrame::Error {
            message: message.to_string(),
        });
    }

    fn reply(&mut self, reply: Reply) {
        self.push(OutboundFrame::Reply(reply));
    }
}

/// Encodes one frame for the wire.  Frames are plain JSON objects
/// discriminated by their `type` field.
pub fn encode_frame(frame: &OutboundFrame) -> Result<String, serde_json::Error> {
    serde_json::to_string(frame)
}
