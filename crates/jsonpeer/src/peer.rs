//! # RPC Peer with Async Pump
//!
//! This module provides the `Peer`, one JSON-RPC endpoint over one transport.
//! A peer both serves (methods exposed on it) and calls (methods exposed by the
//! remote side). It spawns a pump task that reads frames from the transport and
//! feeds them to `on_data`, which dispatches calls and settles pending replies.
//!
//! The registry and the correlation table belong to the peer; nothing is shared
//! between peers. Wrap a peer in `Arc` to call it from several tasks.
//!
//! Handlers run on the pump, one frame at a time. A handler that awaits a call
//! over its own peer will not see the reply until it returns; spawn such work.

use std::sync::Arc;

use dashmap::DashMap;
use jsonwire::CallMessage;
use jsonwire::Frame;
use jsonwire::Params;
use jsonwire::make_call_message;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::batch::Batch;
use crate::builder::PeerBuilder;
use crate::config::PeerConfig;
use crate::error::Error;
use crate::error::Result;
use crate::handler::Handler;
use crate::pending::PendingReply;
use crate::pending::PendingTable;
use crate::transport;
use crate::transport::Transport;

pub(crate) struct PeerInner {
    pub(crate) config: PeerConfig,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) registry: DashMap<String, Arc<dyn Handler>>,
    pub(crate) pending: Arc<PendingTable>,
}

/// A JSON-RPC 2.0 endpoint.
pub struct Peer {
    inner: Arc<PeerInner>,
    pump: JoinHandle<()>,
}

impl Peer {
    /// Creates a peer with the default configuration and spawns its pump.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn new(transport: impl Transport) -> Self {
        Self::with_config(Box::new(transport), PeerConfig::default())
    }

    pub fn builder(transport: impl Transport) -> PeerBuilder {
        PeerBuilder::new(Box::new(transport))
    }

    pub(crate) fn with_config(transport: Box<dyn Transport>, config: PeerConfig) -> Self {
        let inner = Arc::new(PeerInner {
            config,
            transport: Arc::from(transport),
            registry: DashMap::new(),
            pending: Arc::new(PendingTable::default()),
        });

        let pump = tokio::spawn(Self::pump(Arc::clone(&inner)));

        Self { inner, pump }
    }

    /// Feeds inbound frames to `on_data` until the transport closes or a reply
    /// cannot be sent, then fails everything still waiting for a reply.
    ///
    /// A violation only costs the frame it arrived in.
    async fn pump(inner: Arc<PeerInner>) {
        let cause = loop {
            match inner.transport.recv().await {
                Ok(Some(frame)) => match inner.on_data(&frame).await {
                    Ok(()) => {}
                    // The frame is lost, the endpoint is not.
                    Err(Error::Violation(violation)) => {
                        tracing::error!(peer = %inner.config.name, violation = %violation, "dropped frame");
                    }
                    Err(e) => {
                        tracing::error!(peer = %inner.config.name, error = %e, "stopping pump");
                        break e;
                    }
                },
                Ok(None) => {
                    tracing::debug!(peer = %inner.config.name, "transport closed");
                    break Error::Transport(transport::Error::ConnectionLost("Stream closed".into()));
                }
                Err(e) => {
                    tracing::error!(peer = %inner.config.name, error = %e, "transport error in pump");
                    break Error::Transport(e);
                }
            }
        };

        inner.pending.fail_all(&cause);
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    pub fn config(&self) -> &PeerConfig {
        &self.inner.config
    }

    /// Registers `handler` under `name`, replacing any earlier registration.
    pub fn expose(&self, name: impl Into<String>, handler: impl Handler) {
        self.inner.registry.insert(name.into(), Arc::new(handler));
    }

    /// Removes the registration for `name`. Returns whether there was one.
    pub fn unexpose(&self, name: &str) -> bool {
        self.inner.registry.remove(name).is_some()
    }

    pub fn is_exposed(&self, name: &str) -> bool {
        self.inner.registry.contains_key(name)
    }

    /// Number of calls still waiting for a reply.
    pub fn pending_calls(&self) -> usize {
        self.inner.pending.len()
    }

    /// Calls `method` on the remote side and waits for its reply.
    ///
    /// # Errors
    /// - `Error::Remote` with the peer's error object if it answered with an error.
    /// - `Error::Timeout` if a call timeout is configured and elapses.
    /// - `Error::Transport` if the request could not be sent.
    pub async fn call(&self, method: &str, params: impl Into<Params>) -> Result<Value> {
        let (message, reply) = self.prepare_call(method, params)?;

        // On failure `reply` is dropped here, which removes its entry.
        self.inner.send_frame(&Frame::Single(message.into())).await?;

        reply.await
    }

    /// Registers a pending call and builds its request without sending it.
    ///
    /// The caller is responsible for getting the message onto the wire, e.g.
    /// as part of a larger frame.
    pub fn prepare_call(&self, method: &str, params: impl Into<Params>) -> Result<(CallMessage, PendingReply)> {
        let reply = self.inner.pending.register(self.inner.config.call_timeout)?;
        let message = make_call_message(method, params.into(), Some(reply.id().clone()));
        Ok((message, reply))
    }

    /// Sends a notification. No reply is expected and none is tracked.
    pub async fn notify(&self, method: &str, params: impl Into<Params>) -> Result<()> {
        let message = make_call_message(method, params.into(), None);
        self.inner.send_frame(&Frame::Single(message.into())).await
    }

    /// Starts an outbound batch.
    pub fn batch(&self) -> Batch<'_> {
        Batch::new(self)
    }

    /// Processes one inbound frame.
    ///
    /// The pump calls this for every frame the transport yields; it is public
    /// so that hosts driving their own receive loop can feed frames directly.
    ///
    /// # Errors
    /// Under `ViolationPolicy::Strict`, returns `Error::Violation` for a reply
    /// with an unknown id or a message that is neither call nor reply. The peer
    /// stays usable and its pending calls are untouched. Also fails if a reply
    /// cannot be sent.
    pub async fn on_data(&self, text: &str) -> Result<()> {
        self.inner.on_data(text).await
    }

    pub(crate) async fn send_frame(&self, frame: &Frame) -> Result<()> {
        self.inner.send_frame(frame).await
    }
}

impl Drop for Peer {
    fn drop(&mut self) {
        self.pump.abort();
        self.inner.pending.fail_all(&Error::Closed);
    }
}
