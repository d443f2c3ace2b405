//! # JsonWire
//!
//! The three JSON-RPC 2.0 message shapes, their constructors, and the text codec.
//!
//! ## Architecture
//!
//! The codec is shallow. `decode` only checks that a frame is
//! syntactically valid JSON and splits batches from single documents; deciding
//! whether an element is a call, a result or an error is left to the endpoint,
//! which does it by field presence. The typed messages in [`message`] are what
//! an endpoint builds and hands to `encode`.

pub mod codec;
pub mod error;
pub mod message;

pub use codec::Decoded;
pub use codec::decode;
pub use codec::encode;
pub use codec::encode_message;
pub use error::Error;
pub use error::Result;
pub use error::code;
pub use message::CallMessage;
pub use message::ErrorMessage;
pub use message::ErrorObject;
pub use message::Frame;
pub use message::Id;
pub use message::Message;
pub use message::Params;
pub use message::ResultMessage;
pub use message::VERSION;
pub use message::Version;
pub use message::make_call_message;
pub use message::make_error_message;
pub use message::make_result_message;

#[cfg(test)]
mod tests;
