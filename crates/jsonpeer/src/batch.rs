//! Outbound batches: several calls and notifications sent as one frame.

use jsonwire::Frame;
use jsonwire::Message;
use jsonwire::Params;
use jsonwire::make_call_message;

use crate::error::Result;
use crate::peer::Peer;
use crate::pending::PendingReply;

/// Collects messages for one outbound batch frame.
///
/// Calls are registered as soon as they are added, so their replies can be
/// awaited once the batch has been sent. Dropping the batch unsent drops nothing
/// the caller still holds: the returned [`PendingReply`] handles own their entries.
pub struct Batch<'a> {
    peer: &'a Peer,
    messages: Vec<Message>,
}

impl<'a> Batch<'a> {
    pub(crate) fn new(peer: &'a Peer) -> Self {
        Self { peer, messages: Vec::new() }
    }

    /// Adds a call and returns the handle its reply will arrive on.
    pub fn call(&mut self, method: &str, params: impl Into<Params>) -> Result<PendingReply> {
        let (message, reply) = self.peer.prepare_call(method, params)?;
        self.messages.push(message.into());
        Ok(reply)
    }

    pub fn notify(&mut self, method: &str, params: impl Into<Params>) {
        self.messages.push(make_call_message(method, params.into(), None).into());
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Sends everything as one JSON array. An empty batch sends nothing.
    pub async fn send(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        self.peer.send_frame(&Frame::Batch(self.messages)).await
    }
}
