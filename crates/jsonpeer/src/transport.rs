//! # Transport Abstraction
//!
//! A minimal, async interface for moving text frames between endpoints.
//!
//! ## Philosophy
//!
//! - **Frame-Oriented**: The Transport knows nothing about JSON-RPC. It moves opaque
//!   text frames, and it owns framing: every frame it yields from `recv` is exactly
//!   one JSON document or batch.
//! - **Fire-and-Forget**: `send` hands a frame over for delivery. Correlating replies
//!   is the endpoint's job, not the transport's.

use std::fmt;

/// Errors that occur at the network/transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The peer is unreachable or the connection was dropped.
    ConnectionLost(String),
    /// Generic I/O error or internal transport failure.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionLost(msg) => write!(f, "Connection lost: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// A bidirectional channel of text frames.
///
/// This trait is designed to be object-safe (`Arc<dyn Transport>`).
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Hands one fully encoded message or batch to the transport.
    async fn send(&self, frame: &str) -> Result<()>;

    /// Waits for the next complete inbound frame.
    ///
    /// # invariants
    /// - Must return `Ok(None)` once the remote side has closed for good.
    /// - Should not interpret the payload content.
    async fn recv(&self) -> Result<Option<String>>;
}
