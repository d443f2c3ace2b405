//! # Inbound Dispatch
//!
//! Turns one inbound frame into zero or more outbound replies.
//!
//! ## Invariants
//! - **Replies Only To Requests**: A result or error is produced only for a call
//!   that carried an id. Notifications never produce output, not even on failure.
//! - **Never Reply To Replies**: Results and errors settle a pending call and
//!   produce nothing.
//! - **Batch Fan-In**: Every element of a batch is processed before the aggregate
//!   reply is sent, and an aggregate with nothing in it is not sent at all.
//! - **Violations Stay Local**: A message that can't be attributed is never
//!   answered on the wire.

use jsonwire::Decoded;
use jsonwire::ErrorObject;
use jsonwire::Frame;
use jsonwire::Id;
use jsonwire::Message;
use jsonwire::Params;
use jsonwire::Version;
use jsonwire::code;
use jsonwire::make_error_message;
use jsonwire::make_result_message;
use serde_json::Map;
use serde_json::Value;

use crate::config::ViolationPolicy;
use crate::error::Error;
use crate::error::Result;
use crate::error::Violation;
use crate::peer::PeerInner;

type Fields = Map<String, Value>;

impl PeerInner {
    pub(crate) async fn on_data(&self, text: &str) -> Result<()> {
        tracing::debug!(peer = %self.config.name, frame = %text, "received");

        let decoded = match jsonwire::decode(text) {
            Ok(decoded) => decoded,
            Err(e) => {
                let description = match e {
                    jsonwire::Error::Parse(description) => description,
                    other => other.to_string(),
                };
                let reply = make_error_message(None, code::PARSE_ERROR, description, None);
                return self.send_frame(&Frame::Single(reply.into())).await;
            }
        };

        match decoded {
            Decoded::Single(value) => {
                if let Some(reply) = self.process(value).await? {
                    self.send_frame(&Frame::Single(reply)).await?;
                }
            }
            Decoded::Batch(values) => {
                let mut replies = Vec::new();
                for value in values {
                    if let Some(reply) = self.process(value).await? {
                        replies.push(reply);
                    }
                }
                if !replies.is_empty() {
                    self.send_frame(&Frame::Batch(replies)).await?;
                }
            }
        }

        Ok(())
    }

    pub(crate) async fn send_frame(&self, frame: &Frame) -> Result<()> {
        let text = jsonwire::encode(frame)?;
        tracing::debug!(peer = %self.config.name, frame = %text, "sending");
        self.transport.send(&text).await?;
        Ok(())
    }

    /// Routes one message by field presence: `method` means call, otherwise a
    /// non-null `id` means reply, otherwise it is a violation.
    async fn process(&self, value: Value) -> Result<Option<Message>> {
        let Value::Object(fields) = value else {
            return self.violation(Violation::Shapeless);
        };

        if fields.contains_key("method") {
            return Ok(self.dispatch_call(&fields).await);
        }

        match fields.get("id") {
            Some(Value::String(id)) => self.settle_reply(Id::new(id.as_str()), &fields),
            Some(Value::Null) | None => {
                let uncorrelated = fields
                    .get("error")
                    .and_then(|error| serde_json::from_value::<ErrorObject>(error.clone()).ok());
                match uncorrelated {
                    Some(error) => self.violation(Violation::UncorrelatedError(error)),
                    None => self.violation(Violation::Shapeless),
                }
            }
            // Ids we issue are strings, so this cannot match a pending call.
            Some(other) => self.violation(Violation::UnknownReplyId(Id::new(other.to_string()))),
        }
    }

    async fn dispatch_call(&self, fields: &Fields) -> Option<Message> {
        let id = match fields.get("id") {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(Id::new(id.as_str())),
            Some(other) => {
                let reason = format!("id must be a string, got {}", other);
                return Some(error_reply(None, ErrorObject::invalid_request(reason)));
            }
        };

        let Some(Value::String(method)) = fields.get("method") else {
            return self.reject(id, ErrorObject::invalid_request("method must be a string"));
        };

        if !fields.get("jsonrpc").is_some_and(Version::matches) {
            return self.reject(id, ErrorObject::invalid_request("jsonrpc must be \"2.0\""));
        }

        let Some(params) = Params::from_wire(fields.get("params")) else {
            return self.reject(id, ErrorObject::invalid_params("params must be an array or an object"));
        };

        let Some(handler) = self.registry.get(method.as_str()).map(|entry| entry.value().clone()) else {
            tracing::debug!(peer = %self.config.name, method = %method, "method not found");
            return id.map(|id| error_reply(Some(id), ErrorObject::method_not_found()));
        };

        match (handler.invoke(params).await, id) {
            (Ok(result), Some(id)) => Some(make_result_message(id, result).into()),
            (Ok(_), None) => None,
            (Err(e), Some(id)) => Some(make_error_message(Some(id), code::HANDLER_ERROR, e.message, e.data).into()),
            (Err(e), None) => {
                tracing::debug!(peer = %self.config.name, method = %method, error = %e, "notification handler failed");
                None
            }
        }
    }

    /// Answers a malformed call if it has an id to answer to, drops it otherwise.
    fn reject(&self, id: Option<Id>, error: ErrorObject) -> Option<Message> {
        if id.is_none() {
            tracing::debug!(peer = %self.config.name, error = %error, "dropping malformed notification");
        }
        id.map(|id| error_reply(Some(id), error))
    }

    fn settle_reply(&self, id: Id, fields: &Fields) -> Result<Option<Message>> {
        let outcome = if !fields.get("jsonrpc").is_some_and(Version::matches) {
            Err(Error::InvalidReply("jsonrpc must be \"2.0\"".into()))
        } else if let Some(error) = fields.get("error") {
            match serde_json::from_value::<ErrorObject>(error.clone()) {
                Ok(error) => Err(Error::Remote(error)),
                Err(e) => Err(Error::InvalidReply(format!("malformed error object: {}", e))),
            }
        } else {
            Ok(fields.get("result").cloned().unwrap_or(Value::Null))
        };

        if let Err(Error::InvalidReply(reason)) = &outcome {
            tracing::warn!(peer = %self.config.name, id = %id, reason = %reason, "malformed reply");
        }

        if !self.pending.resolve(&id, outcome) {
            return self.violation(Violation::UnknownReplyId(id));
        }

        Ok(None)
    }

    fn violation(&self, violation: Violation) -> Result<Option<Message>> {
        match self.config.violation_policy {
            ViolationPolicy::Strict => Err(Error::Violation(violation)),
            ViolationPolicy::Isolate => {
                tracing::warn!(peer = %self.config.name, violation = %violation, "ignoring message");
                Ok(None)
            }
        }
    }
}

fn error_reply(id: Option<Id>, error: ErrorObject) -> Message {
    make_error_message(id, error.code, error.message, error.data).into()
}
