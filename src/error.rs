// ABOUTME: Error type shared by the chat and upload webhook paths.
// ABOUTME: Every variant collapses into the single "failure" branch of its session manager.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook returned HTTP {status}")]
    Status { status: u16 },
    #[error("could not decode webhook response: {0}")]
    Decode(String),
    #[error("file is {size} bytes, over the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
