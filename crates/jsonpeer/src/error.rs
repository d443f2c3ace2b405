//! # Error Definitions
//!
//! What a caller of the endpoint can observe failing. Failures reported by the
//! remote peer arrive as `Remote`; failures of the local protocol state machine
//! arrive as `Violation` and are never put on the wire.

use std::fmt;

use jsonwire::ErrorObject;
use jsonwire::Id;

use crate::transport;

/// A message the endpoint cannot attribute to anything it knows about.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// A result or error whose id matches no outstanding call. Usually a
    /// duplicate delivery, a reply to a call that was cancelled or timed out,
    /// or a correlation bug in the peer.
    UnknownReplyId(Id),
    /// Neither a call nor a reply: no `method` and no usable `id`.
    Shapeless,
    /// An error reply with a null id, e.g. the peer failing to parse one of our frames.
    UncorrelatedError(ErrorObject),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownReplyId(id) => write!(f, "Received a non-matching response id \"{}\"", id),
            Self::Shapeless => write!(f, "Received a non-call non-id JSON-RPC message"),
            Self::UncorrelatedError(error) => write!(f, "Received an uncorrelated error: {}", error),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Transport(transport::Error),
    Wire(jsonwire::Error),
    /// The remote handler or endpoint answered with an error object.
    Remote(ErrorObject),
    /// A reply matched an outstanding call but its envelope was malformed.
    InvalidReply(String),
    Violation(Violation),
    /// The configured call timeout elapsed before a reply arrived.
    Timeout,
    /// The reply channel was dropped without a value.
    ChannelClosed,
    /// The endpoint's pump has stopped; no reply can arrive any more.
    Closed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Wire(e) => write!(f, "Wire error: {}", e),
            Self::Remote(error) => write!(f, "Remote failure: {}", error),
            Self::InvalidReply(reason) => write!(f, "Invalid reply: {}", reason),
            Self::Violation(v) => write!(f, "Protocol violation: {}", v),
            Self::Timeout => write!(f, "Request timed out"),
            Self::ChannelClosed => write!(f, "Response channel closed"),
            Self::Closed => write!(f, "Endpoint is closed"),
        }
    }
}

impl std::error::Error for Error {}

impl From<transport::Error> for Error {
    fn from(e: transport::Error) -> Self {
        Self::Transport(e)
    }
}

impl From<jsonwire::Error> for Error {
    fn from(e: jsonwire::Error) -> Self {
        Self::Wire(e)
    }
}

impl From<Violation> for Error {
    fn from(v: Violation) -> Self {
        Self::Violation(v)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
