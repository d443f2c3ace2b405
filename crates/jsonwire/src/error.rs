//! # Error Definitions
//!
//! Codec failures, and the reserved JSON-RPC codes an endpoint puts on the wire.

/// Failures of the text codec itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The inbound text is not syntactically valid JSON.
    Parse(String),
    /// A message could not be serialized to text.
    Encode(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::Encode(msg) => write!(f, "Encode error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error codes from the reserved JSON-RPC range.
pub mod code {
    /// Inbound text is not valid JSON.
    pub const PARSE_ERROR: i64 = -32700;
    /// The message is not a valid request object.
    pub const INVALID_REQUEST: i64 = -32600;
    /// The call references a method nobody exposed.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// `params` is neither an array nor an object.
    pub const INVALID_PARAMS: i64 = -32602;
    /// A registered handler failed.
    pub const HANDLER_ERROR: i64 = -32000;

    pub const METHOD_NOT_FOUND_MESSAGE: &str = "method not found";
}
