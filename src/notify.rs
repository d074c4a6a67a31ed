// ABOUTME: Transient notifications shown above the status bar.
// ABOUTME: Notices carry a title, description, and severity, and expire after a fixed TTL.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub raised_at: Instant,
}

impl Notice {
    pub fn new(severity: Severity, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            raised_at: Instant::now(),
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Info, title, description)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Success, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Error, title, description)
    }
}

/// Newest-last list of live notices.
#[derive(Debug)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    ttl: Duration,
    /// Maximum notices kept at once; the oldest are dropped first.
    capacity: usize,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            notices: Vec::new(),
            ttl,
            capacity: 4,
        }
    }

    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
        if self.notices.len() > self.capacity {
            let excess = self.notices.len() - self.capacity;
            self.notices.drain(..excess);
        }
    }

    /// Drop notices older than the TTL. Returns true if anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.notices.len();
        let ttl = self.ttl;
        self.notices
            .retain(|n| now.saturating_duration_since(n.raised_at) < ttl);
        self.notices.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }
}
