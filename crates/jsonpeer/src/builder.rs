//! # Peer Builder
//!
//! Fluent API for configuring an endpoint before its pump starts.

use std::time::Duration;

use crate::config::PeerConfig;
use crate::config::ViolationPolicy;
use crate::peer::Peer;
use crate::transport::Transport;

/// Fluent builder for [`Peer`].
pub struct PeerBuilder {
    transport: Box<dyn Transport>,
    config: PeerConfig,
}

impl PeerBuilder {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            config: PeerConfig::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Bounds every call. Without it a call whose reply never arrives waits forever.
    pub fn call_timeout(mut self, limit: Duration) -> Self {
        self.config.call_timeout = Some(limit);
        self
    }

    pub fn violation_policy(mut self, policy: ViolationPolicy) -> Self {
        self.config.violation_policy = policy;
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: PeerConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the peer and spawns its pump on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn build(self) -> Peer {
        Peer::with_config(self.transport, self.config)
    }
}
