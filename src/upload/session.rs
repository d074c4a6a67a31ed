// ABOUTME: UploadSession: the set of upload records and their status transitions.
// ABOUTME: Rejects oversized files, advances simulated progress, settles, removes, and retries records.

use std::fmt;
use std::path::PathBuf;

use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::error::WebhookError;
use crate::notify::Notice;
use crate::upload::format_file_size;
use crate::upload::selection::SelectedFile;
use crate::webhook::UploadPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(pub Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Uploading,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub id: UploadId,
    pub name: String,
    pub size: u64,
    pub status: UploadStatus,
    /// 0..=100. Reaches 100 only on success.
    pub progress: u8,
    /// Where the file was selected from; retry re-reads it.
    pub source: PathBuf,
}

/// One file to post; produced by `submit_files` and `retry`.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub id: UploadId,
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    /// Size limit the file must still respect when it is read.
    pub max_bytes: u64,
}

impl UploadJob {
    /// Read the file into a multipart payload, never buffering more than `max_bytes + 1`.
    /// The posted `size` is the number of bytes actually read.
    pub async fn read_payload(&self) -> Result<UploadPayload, WebhookError> {
        let io_err = |source: std::io::Error| WebhookError::Io {
            path: self.path.clone(),
            source,
        };
        let file = tokio::fs::File::open(&self.path).await.map_err(io_err)?;
        let len = file.metadata().await.map_err(io_err)?.len();
        if len > self.max_bytes {
            return Err(WebhookError::TooLarge {
                size: len,
                limit: self.max_bytes,
            });
        }

        let mut bytes = Vec::with_capacity(len as usize);
        file.take(self.max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .await
            .map_err(io_err)?;
        let size = bytes.len() as u64;
        if size > self.max_bytes {
            return Err(WebhookError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        if size != self.size {
            debug!(
                id = %self.id,
                selected = self.size,
                read = size,
                "file size changed since selection"
            );
        }

        Ok(UploadPayload {
            filename: self.name.clone(),
            size,
            bytes,
        })
    }
}

/// Jobs to start and notices to raise for one selection.
#[derive(Debug, Default)]
pub struct Submission {
    pub jobs: Vec<UploadJob>,
    pub notices: Vec<Notice>,
}

/// Size limit and progress simulation parameters.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_file_bytes: u64,
    pub progress_step: u8,
    pub progress_cap: u8,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self::from(&UploadConfig::default())
    }
}

impl From<&UploadConfig> for UploadLimits {
    fn from(config: &UploadConfig) -> Self {
        Self {
            max_file_bytes: config.max_file_bytes,
            progress_step: config.progress_step.max(1),
            progress_cap: config.progress_cap.clamp(1, 99),
        }
    }
}

#[derive(Debug, Default)]
pub struct UploadSession {
    records: Vec<UploadRecord>,
    limits: UploadLimits,
}

impl UploadSession {
    pub fn new(limits: UploadLimits) -> Self {
        Self {
            records: Vec::new(),
            limits,
        }
    }

    pub fn records(&self) -> &[UploadRecord] {
        &self.records
    }

    pub fn get(&self, id: UploadId) -> Option<&UploadRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn limits(&self) -> UploadLimits {
        self.limits
    }

    /// Number of records still waiting on the webhook.
    pub fn in_flight(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == UploadStatus::Uploading)
            .count()
    }

    /// Create one record and one job per acceptable file, in selection order.
    /// Oversized files get a notice and no record.
    pub fn submit_files(&mut self, selection: Vec<SelectedFile>) -> Submission {
        let mut submission = Submission::default();

        for file in selection {
            if file.size > self.limits.max_file_bytes {
                info!(name = %file.name, size = file.size, "rejecting oversized file");
                submission.notices.push(self.too_large_notice(&file.name));
                continue;
            }

            let id = UploadId::new();
            info!(%id, name = %file.name, size = file.size, "starting upload");
            self.records.push(UploadRecord {
                id,
                name: file.name.clone(),
                size: file.size,
                status: UploadStatus::Uploading,
                progress: 0,
                source: file.path.clone(),
            });
            submission.jobs.push(UploadJob {
                id,
                path: file.path,
                name: file.name,
                size: file.size,
                max_bytes: self.limits.max_file_bytes,
            });
        }

        submission
    }

    /// Advance simulated progress by one step, never past the cap.
    /// Returns false if the record is gone or no longer uploading.
    pub fn tick(&mut self, id: UploadId) -> bool {
        let step = self.limits.progress_step;
        let cap = self.limits.progress_cap;
        match self.record_mut(id) {
            Some(record) if record.status == UploadStatus::Uploading => {
                let next = record.progress.saturating_add(step).min(cap);
                let changed = next != record.progress;
                record.progress = next;
                changed
            }
            _ => false,
        }
    }

    /// Apply the webhook outcome to an uploading record and return its notice.
    /// Outcomes for removed or already-settled records are dropped.
    pub fn settle(&mut self, id: UploadId, result: Result<(), WebhookError>) -> Option<Notice> {
        let Some(record) = self.record_mut(id) else {
            debug!(%id, "upload settled after its record was removed");
            return None;
        };
        if record.status != UploadStatus::Uploading {
            return None;
        }

        match result {
            Ok(()) => {
                record.status = UploadStatus::Success;
                record.progress = 100;
                info!(%id, name = %record.name, "upload succeeded");
                Some(Notice::success(
                    "Success",
                    format!("File \"{}\" uploaded successfully!", record.name),
                ))
            }
            Err(e) => {
                record.status = UploadStatus::Error;
                record.progress = 0;
                warn!(%id, name = %record.name, error = %e, "upload failed");
                Some(Notice::error(
                    "Upload Failed",
                    format!("Failed to upload \"{}\". Please try again.", record.name),
                ))
            }
        }
    }

    /// Remove a record. Any request still running for it is left alone.
    pub fn remove(&mut self, id: UploadId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// Re-issue a failed upload from its retained source path.
    ///
    /// The file is re-read from disk, so it must still exist and fit the size
    /// limit. On success the record goes back to uploading at 0% and a job with
    /// the same id is returned; otherwise the record is untouched and the notice
    /// asks the user to select the file again.
    pub fn retry(&mut self, id: UploadId) -> Result<UploadJob, Notice> {
        let max = self.limits.max_file_bytes;
        let Some(record) = self.records.iter().find(|r| r.id == id) else {
            return Err(reselect_notice());
        };
        if record.status != UploadStatus::Error {
            return Err(Notice::info("Retry", "Only failed uploads can be retried."));
        }

        let file = match SelectedFile::from_path(&record.source) {
            Ok(file) => file,
            Err(e) => {
                warn!(%id, path = %record.source.display(), error = %e, "retry source unavailable");
                return Err(reselect_notice());
            }
        };
        if file.size > max {
            return Err(self.too_large_notice(&record.name));
        }

        let Some(record) = self.record_mut(id) else {
            return Err(reselect_notice());
        };
        record.status = UploadStatus::Uploading;
        record.progress = 0;
        record.size = file.size;
        info!(%id, name = %record.name, "retrying upload");

        Ok(UploadJob {
            id,
            path: record.source.clone(),
            name: record.name.clone(),
            size: file.size,
            max_bytes: max,
        })
    }

    fn record_mut(&mut self, id: UploadId) -> Option<&mut UploadRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    fn too_large_notice(&self, name: &str) -> Notice {
        let limit = format_file_size(self.limits.max_file_bytes).replace(' ', "");
        Notice::error(
            "File Too Large",
            format!("\"{}\" is too large. Maximum size is {}.", name, limit),
        )
    }
}

fn reselect_notice() -> Notice {
    Notice::info("Retry", "Please select the file again to retry upload.")
}
