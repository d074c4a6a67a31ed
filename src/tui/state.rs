// ABOUTME: TUI state types: pane focus, background task events, and the commands update() returns.
// ABOUTME: Bridges the spawned webhook tasks back to the UI loop.

use crate::error::WebhookError;
use crate::upload::{UploadId, UploadJob};
use crate::webhook::{ChatReply, ChatRequest};

/// Which pane receives key and paste events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Chat,
    Upload,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Chat => Focus::Upload,
            Focus::Upload => Focus::Chat,
        }
    }
}

/// Events sent from background tasks to the UI loop via an mpsc channel.
#[derive(Debug)]
pub enum AppEvent {
    /// The chat webhook call finished.
    ChatSettled(Result<ChatReply, WebhookError>),
    /// One simulated progress step for an upload.
    UploadProgress(UploadId),
    /// The upload webhook call for one file finished.
    UploadSettled {
        id: UploadId,
        result: Result<(), WebhookError>,
    },
}

/// Side effects requested by `DeskApp::update`, executed by the app loop.
#[derive(Debug)]
pub enum Command {
    None,
    Quit,
    SendChat(ChatRequest),
    StartUploads(Vec<UploadJob>),
}

impl Command {
    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}
