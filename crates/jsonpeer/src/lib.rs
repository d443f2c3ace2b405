//! # JsonPeer
//!
//! A transport-agnostic JSON-RPC 2.0 endpoint.
//!
//! ## Architecture
//!
//! A [`Peer`] sits on top of a [`Transport`] that moves text frames. Outbound,
//! `call` issues a fresh id, records a pending entry in the correlation table,
//! and sends the request; the returned future completes when the matching reply
//! is processed. Inbound, the pump hands every frame to `on_data`, which either
//! dispatches a call to the handler registered under its method name, or settles
//! the pending entry a reply belongs to.
//!
//! ```ignore
//! let (a, b) = ChannelTransport::pair();
//! let server = Peer::new(a);
//! server.expose("add", |params: Params| -> HandlerResult {
//!     let (x, y): (i64, i64) = params.parse()?;
//!     Ok((x + y).into())
//! });
//! let client = Peer::new(b);
//! assert_eq!(client.call("add", json!([1, 2])).await?, json!(3));
//! ```

pub mod batch;
pub mod builder;
pub mod config;
mod dispatch;
pub mod error;
pub mod handler;
pub mod loopback;
pub mod peer;
pub mod pending;
pub mod transport;

pub use batch::Batch;
pub use builder::PeerBuilder;
pub use config::PeerConfig;
pub use config::ViolationPolicy;
pub use error::Error;
pub use error::Result;
pub use error::Violation;
pub use handler::Handler;
pub use handler::HandlerError;
pub use handler::HandlerResult;
pub use handler::handler_fn;
pub use loopback::ChannelTransport;
pub use peer::Peer;
pub use pending::PendingReply;
pub use transport::Transport;

pub use jsonwire::ErrorObject;
pub use jsonwire::Id;
pub use jsonwire::Params;
