// ABOUTME: Webhook module: request/reply types and the endpoint traits both session managers call.
// ABOUTME: The reqwest-backed implementation lives in client.rs; tests substitute their own.

pub mod client;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::WebhookError;

pub use client::WebhookClient;

/// JSON body posted to the chat webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub timestamp: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// The two optional fields a chat webhook may answer with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatReply {
    pub response: Option<String>,
    pub message: Option<String>,
}

impl ChatReply {
    /// Pick `response` and `message` out of an arbitrary JSON reply.
    /// Anything that isn't an object, or fields that aren't strings, count as absent.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };
        Self {
            response: field("response"),
            message: field("message"),
        }
    }

    /// The first non-empty of `response`, then `message`.
    pub fn text(&self) -> Option<&str> {
        [self.response.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
    }
}

/// Multipart payload posted to the upload webhook.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub filename: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    /// Post one chat message. Non-2xx and undecodable bodies are errors.
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, WebhookError>;
}

#[async_trait]
pub trait UploadEndpoint: Send + Sync {
    /// Post one file. Any 2xx is success; the body is ignored.
    async fn upload(&self, payload: UploadPayload) -> Result<(), WebhookError>;
}
