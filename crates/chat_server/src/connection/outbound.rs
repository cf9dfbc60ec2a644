//! Outbound delivery capability for a single session.
//!
//! Each session owns exactly one [`Outbound`]. It is the sending half of an
//! unbounded channel drained by the connection's outgoing task, so sending
//! never blocks and never fails observably: once the connection is gone the
//! frame is simply dropped.

use tokio::sync::mpsc;
use tracing::trace;

/// A frame queued for delivery to one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    /// One chat line
    Text(String),
    /// Close the connection with the given reason
    Close(String),
}

/// Owned handle used to deliver frames to one participant.
///
/// Not `Clone`: the handle lives inside its registry entry and
/// is dropped together with it.
#[derive(Debug)]
pub struct Outbound {
    sender: mpsc::UnboundedSender<Outgoing>,
}

impl Outbound {
    /// Creates a handle together with the receiver the transport drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Outgoing>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Queues a text line. Returns `false` if the receiver is gone.
    pub fn send(&self, text: impl Into<String>) -> bool {
        if self.sender.send(Outgoing::Text(text.into())).is_err() {
            trace!("Dropping line for a closed connection");
            return false;
        }
        true
    }

    /// Asks the transport to sever the connection after the queued lines.
    pub fn close(&self, reason: impl Into<String>) {
        let _ = self.sender.send(Outgoing::Close(reason.into()));
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_then_close_preserves_order() {
        let (outbound, mut rx) = Outbound::channel();
        assert!(outbound.send("hello"));
        outbound.close("bye");

        assert_eq!(rx.recv().await, Some(Outgoing::Text("hello".into())));
        assert_eq!(rx.recv().await, Some(Outgoing::Close("bye".into())));
    }

    #[test]
    fn test_send_after_receiver_dropped_is_silent() {
        let (outbound, rx) = Outbound::channel();
        drop(rx);
        assert!(outbound.is_closed());
        assert!(!outbound.send("nobody listens"));
        outbound.close("still fine");
    }
}
