//! # Handlers
//!
//! Application code exposed under a method name.
//!
//! Any `Fn(Params) -> HandlerResult` is a handler. Async functions go through
//! [`handler_fn`]. Arguments are not checked against any signature up front; a
//! handler that cannot make sense of its `Params` fails, and that failure
//! travels back to the caller like any other.

use std::fmt;
use std::future::Future;

use jsonwire::Params;
use serde_json::Value;

/// How a handler fails. Becomes a `-32000` error reply carrying `message` and `data`.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerError {
    pub message: String,
    pub data: Option<Value>,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), data: None }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HandlerError {}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Lets handlers use `?` on `Params::parse` and `Params::arg`.
impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("invalid arguments: {}", e))
    }
}

pub type HandlerResult = std::result::Result<Value, HandlerError>;

/// An invocable registered under a method name.
#[async_trait::async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn invoke(&self, params: Params) -> HandlerResult;
}

#[async_trait::async_trait]
impl<F> Handler for F
where
    F: Fn(Params) -> HandlerResult + Send + Sync + 'static,
{
    async fn invoke(&self, params: Params) -> HandlerResult {
        self(params)
    }
}

/// Adapter returned by [`handler_fn`].
pub struct AsyncFn<F>(F);

/// Wraps an async closure so it can be exposed.
pub fn handler_fn<F, Fut>(f: F) -> AsyncFn<F>
where
    F: Fn(Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    AsyncFn(f)
}

#[async_trait::async_trait]
impl<F, Fut> Handler for AsyncFn<F>
where
    F: Fn(Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn invoke(&self, params: Params) -> HandlerResult {
        (self.0)(params).await
    }
}
