//! # Messages
//!
//! The JSON-RPC 2.0 envelope: calls, results and errors.
//!
//! ## Invariants
//! - **Version Stamp**: Every message carries `"jsonrpc": "2.0"`. [`Version`] cannot be
//!   deserialized from any other tag, so a typed message is always well-versioned.
//! - **Notification**: A call without an id never expects a reply.
//! - **Null Id**: Only an error may carry a null id, and only when the id of the
//!   offending message could not be determined.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

use crate::error::code;

/// The protocol version tag carried by every message.
pub const VERSION: &str = "2.0";

/// Marker for the `"jsonrpc": "2.0"` member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Version;

impl Version {
    /// Checks a raw `jsonrpc` member without going through serde.
    pub fn matches(tag: &Value) -> bool {
        tag.as_str() == Some(VERSION)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(VERSION)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        if tag == VERSION {
            Ok(Version)
        } else {
            Err(serde::de::Error::custom(format!("unsupported jsonrpc version \"{}\"", tag)))
        }
    }
}

/// Opaque identifier correlating a call with its reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 128 random bits rendered as 32 hex digits.
    ///
    /// Uniqueness among outstanding calls is enforced by the caller's table,
    /// this only has to make collisions unlikely.
    pub fn random() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Id {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Arguments of a call: either positional or keyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl Default for Params {
    fn default() -> Self {
        Params::Positional(Vec::new())
    }
}

impl Params {
    /// Reads the `params` member of an inbound call.
    ///
    /// Absent or `null` means no arguments. Returns `None` for any other
    /// non-structured value.
    pub fn from_wire(value: Option<&Value>) -> Option<Self> {
        match value {
            None | Some(Value::Null) => Some(Params::default()),
            Some(Value::Array(items)) => Some(Params::Positional(items.clone())),
            Some(Value::Object(map)) => Some(Params::Named(map.clone())),
            Some(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Params::Positional(items) => items.len(),
            Params::Named(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positional argument at `index`, if the params are positional.
    pub fn get(&self, index: usize) -> Option<&Value> {
        match self {
            Params::Positional(items) => items.get(index),
            Params::Named(_) => None,
        }
    }

    /// Keyed argument `name`, if the params are keyed.
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        match self {
            Params::Positional(_) => None,
            Params::Named(map) => map.get(name),
        }
    }

    /// Deserializes the whole argument list, e.g. into a tuple for positional
    /// params or a struct for keyed params.
    pub fn parse<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.clone().into_value())
    }

    /// Deserializes the positional argument at `index`.
    pub fn arg<T: DeserializeOwned>(&self, index: usize) -> serde_json::Result<T> {
        let value = self.get(index).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
    }

    pub fn into_value(self) -> Value {
        match self {
            Params::Positional(items) => Value::Array(items),
            Params::Named(map) => Value::Object(map),
        }
    }
}

impl From<Vec<Value>> for Params {
    fn from(items: Vec<Value>) -> Self {
        Params::Positional(items)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params::Named(map)
    }
}

/// Outbound convenience: arrays spread, objects stay keyed, `null` is no
/// arguments, and any other value becomes the single positional argument.
impl From<Value> for Params {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Params::Positional(items),
            Value::Object(map) => Params::Named(map),
            Value::Null => Params::default(),
            scalar => Params::Positional(vec![scalar]),
        }
    }
}

/// A request (with id) or notification (without).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallMessage {
    pub method: String,
    #[serde(default)]
    pub params: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub jsonrpc: Version,
}

impl CallMessage {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// A successful reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMessage {
    #[serde(default)]
    pub result: Value,
    pub id: Id,
    pub jsonrpc: Version,
}

/// The `error` member of an error reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn parse_error(description: impl Into<String>) -> Self {
        Self::new(code::PARSE_ERROR, description)
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(code::INVALID_REQUEST, reason)
    }

    pub fn method_not_found() -> Self {
        Self::new(code::METHOD_NOT_FOUND, code::METHOD_NOT_FOUND_MESSAGE)
    }

    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::new(code::INVALID_PARAMS, reason)
    }
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for ErrorObject {}

/// A failed reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub error: ErrorObject,
    pub id: Option<Id>,
    pub jsonrpc: Version,
}

/// Any one of the three message shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Call(CallMessage),
    Error(ErrorMessage),
    Result(ResultMessage),
}

impl Message {
    pub fn id(&self) -> Option<&Id> {
        match self {
            Message::Call(call) => call.id.as_ref(),
            Message::Error(error) => error.id.as_ref(),
            Message::Result(result) => Some(&result.id),
        }
    }
}

impl From<CallMessage> for Message {
    fn from(call: CallMessage) -> Self {
        Message::Call(call)
    }
}

impl From<ResultMessage> for Message {
    fn from(result: ResultMessage) -> Self {
        Message::Result(result)
    }
}

impl From<ErrorMessage> for Message {
    fn from(error: ErrorMessage) -> Self {
        Message::Error(error)
    }
}

/// The unit of transmission: one message, or a batch serialized as an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Frame {
    Single(Message),
    Batch(Vec<Message>),
}

impl From<Message> for Frame {
    fn from(message: Message) -> Self {
        Frame::Single(message)
    }
}

impl From<Vec<Message>> for Frame {
    fn from(messages: Vec<Message>) -> Self {
        Frame::Batch(messages)
    }
}

// ============================================================================
//  CONSTRUCTORS
// ============================================================================

pub fn make_call_message(method: impl Into<String>, params: Params, id: Option<Id>) -> CallMessage {
    CallMessage { method: method.into(), params, id, jsonrpc: Version }
}

pub fn make_result_message(id: Id, result: Value) -> ResultMessage {
    ResultMessage { result, id, jsonrpc: Version }
}

pub fn make_error_message(
    id: Option<Id>,
    code: i64,
    message: impl Into<String>,
    data: Option<Value>,
) -> ErrorMessage {
    let error = ErrorObject { code, message: message.into(), data };
    ErrorMessage { error, id, jsonrpc: Version }
}
