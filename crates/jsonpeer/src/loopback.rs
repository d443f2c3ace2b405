//! In-process transport.
//!
//! Two [`ChannelTransport`] halves joined back to back, for tests and for
//! wiring endpoints that live in the same process.

use tokio::sync::Mutex;
use tokio::sync::mpsc;

use crate::transport;
use crate::transport::Transport;

/// One half of an unbounded in-memory link. Each `String` is one frame.
///
/// Dropping a half ends the stream its partner reads.
pub struct ChannelTransport {
    outbox: mpsc::UnboundedSender<String>,
    inbox: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl ChannelTransport {
    pub fn new(outbox: mpsc::UnboundedSender<String>, inbox: mpsc::UnboundedReceiver<String>) -> Self {
        Self { outbox, inbox: Mutex::new(inbox) }
    }

    /// Two halves where each one reads what the other writes.
    pub fn pair() -> (Self, Self) {
        let (left_out, right_in) = mpsc::unbounded_channel();
        let (right_out, left_in) = mpsc::unbounded_channel();

        (Self::new(left_out, left_in), Self::new(right_out, right_in))
    }
}

#[async_trait::async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, frame: &str) -> transport::Result<()> {
        self.outbox
            .send(frame.to_owned())
            .map_err(|_| transport::Error::ConnectionLost("partner half dropped".into()))
    }

    async fn recv(&self) -> transport::Result<Option<String>> {
        Ok(self.inbox.lock().await.recv().await)
    }
}
