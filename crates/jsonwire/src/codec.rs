//! # Codec
//!
//! The translation layer between wire text and JSON values.
//!
//! ## Invariants
//! - **Syntax Only**: `decode` rejects text that is not JSON and nothing else. Shape
//!   discrimination happens one level up, so a batch with one bad element still
//!   decodes.
//! - **Arrays Are Batches**: A top-level array is always a batch, a top-level
//!   anything-else is a single message.

use serde_json::Value;

use crate::error::Error;
use crate::error::Result;
use crate::message::Frame;
use crate::message::Message;

/// The result of decoding one inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Single(Value),
    Batch(Vec<Value>),
}

/// Parses one inbound frame.
///
/// # Errors
/// Returns `Error::Parse` with the parser's description if `text` is not valid JSON.
pub fn decode(text: &str) -> Result<Decoded> {
    let value: Value = serde_json::from_str(text).map_err(|e| Error::Parse(e.to_string()))?;

    Ok(match value {
        Value::Array(items) => Decoded::Batch(items),
        other => Decoded::Single(other),
    })
}

/// Serializes a frame to compact JSON text.
pub fn encode(frame: &Frame) -> Result<String> {
    serde_json::to_string(frame).map_err(|e| Error::Encode(e.to_string()))
}

pub fn encode_message(message: &Message) -> Result<String> {
    serde_json::to_string(message).map_err(|e| Error::Encode(e.to_string()))
}
