//! Endpoint configuration.

use std::time::Duration;

/// What the endpoint does with a message it cannot attribute to anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViolationPolicy {
    /// Abort the current frame without sending any of its replies and return
    /// the violation from `on_data`. The pump logs it and reads the next frame;
    /// outstanding calls are not affected.
    #[default]
    Strict,
    /// Log the offending element, skip it, and keep processing.
    Isolate,
}

#[derive(Debug, Clone)]
pub struct PeerConfig {
    /// Label attached to every log event of this endpoint.
    pub name: String,
    /// Upper bound on how long a call waits for its reply. `None` waits forever.
    pub call_timeout: Option<Duration>,
    pub violation_policy: ViolationPolicy,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            name: "peer".to_string(),
            call_timeout: None,
            violation_policy: ViolationPolicy::default(),
        }
    }
}
