// ABOUTME: ChatSession: append-only message log plus the "awaiting response" flag.
// ABOUTME: A send appends the user entry immediately and the bot entry once the webhook settles.

use chrono::{DateTime, Local, Utc};
use tracing::{debug, info, warn};

use crate::error::WebhookError;
use crate::notify::Notice;
use crate::webhook::{ChatEndpoint, ChatReply, ChatRequest};

/// Bot text used when a successful reply carries neither `response` nor `message`.
pub const FALLBACK_REPLY: &str = "I received your message, but I don't have a response right now.";

/// Bot text appended when the webhook call fails.
pub const APOLOGY_REPLY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again later.";

/// Session-unique, strictly increasing message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: MessageId,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    awaiting_response: bool,
    next_id: u64,
}

impl ChatSession {
    /// Create a session whose log starts with a single bot greeting.
    /// An empty greeting starts with an empty log.
    pub fn new(greeting: &str) -> Self {
        let mut session = Self {
            messages: Vec::new(),
            awaiting_response: false,
            next_id: 1,
        };
        if !greeting.is_empty() {
            session.push(Sender::Bot, greeting.to_string());
        }
        session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    /// Start a send. Returns `None` without touching the log when `text` is blank
    /// or another send is still in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<ChatRequest> {
        if text.trim().is_empty() {
            return None;
        }
        if self.awaiting_response {
            debug!("send ignored: a reply is still pending");
            return None;
        }

        self.push(Sender::User, text.to_string());
        self.awaiting_response = true;
        info!(chars = text.chars().count(), "sending chat message");
        Some(ChatRequest::new(text, Utc::now()))
    }

    /// Finish the in-flight send with the webhook's outcome.
    /// Always clears the pending flag. Returns the notice to raise on failure.
    pub fn settle(&mut self, result: Result<ChatReply, WebhookError>) -> Option<Notice> {
        self.awaiting_response = false;

        match result {
            Ok(reply) => {
                let content = reply.text().unwrap_or(FALLBACK_REPLY).to_string();
                if reply.text().is_none() {
                    debug!("chat reply had no text; using fallback");
                }
                self.push(Sender::Bot, content);
                None
            }
            Err(e) => {
                warn!(error = %e, "chat webhook failed");
                self.push(Sender::Bot, APOLOGY_REPLY.to_string());
                Some(Notice::error(
                    "Error",
                    "Failed to send message. Please try again.",
                ))
            }
        }
    }

    /// `begin_send`, one webhook call, then `settle`.
    pub async fn send(&mut self, endpoint: &dyn ChatEndpoint, text: &str) -> Option<Notice> {
        let request = self.begin_send(text)?;
        let result = endpoint.send(&request).await;
        self.settle(result)
    }

    fn push(&mut self, sender: Sender, content: String) {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            content,
            sender,
            timestamp: Local::now(),
        });
    }
}
