// ABOUTME: Configuration loading for hookdesk.
// ABOUTME: Reads ~/.hookdesk/config.toml, then applies environment and CLI overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

/// Environment variable overriding `chat.webhook_url`.
pub const CHAT_URL_ENV: &str = "HOOKDESK_CHAT_URL";
/// Environment variable overriding `upload.webhook_url`.
pub const UPLOAD_URL_ENV: &str = "HOOKDESK_UPLOAD_URL";

/// Errors raised while loading or validating the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no {0} webhook URL configured (set it in config.toml, the environment, or on the command line)")]
    MissingUrl(&'static str),
    #[error("invalid {which} webhook URL '{url}': {reason}")]
    InvalidUrl {
        which: &'static str,
        url: String,
        reason: String,
    },
    #[error("invalid upload progress settings: {0}")]
    InvalidProgress(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chat: ChatConfig,
    pub upload: UploadConfig,
    pub http: HttpConfig,
    pub ui: UiConfig,
}

/// Chat webhook and the fixed texts the chat pane shows.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub webhook_url: Option<String>,
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            greeting: "Hello! I'm your AI assistant. How can I help you today?".to_string(),
        }
    }
}

/// Upload webhook, size limit, and progress simulation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub webhook_url: Option<String>,
    pub max_file_bytes: u64,
    pub progress_step: u8,
    pub progress_cap: u8,
    pub progress_interval_ms: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            max_file_bytes: 10 * 1024 * 1024,
            progress_step: 10,
            progress_cap: 90,
            progress_interval_ms: 100,
        }
    }
}

impl UploadConfig {
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(1))
    }
}

/// HTTP client settings shared by both webhooks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds. Zero means no timeout.
    pub request_timeout_secs: u64,
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

/// Presentation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub notice_ttl_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notice_ttl_ms: 4000,
        }
    }
}

impl UiConfig {
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }
}

/// Values supplied outside the config file, highest precedence first.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub chat_url: Option<String>,
    pub upload_url: Option<String>,
}

/// The two endpoints after merging and validation.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub chat: Url,
    pub upload: Url,
}

impl Config {
    /// Load config from the given path (or the default path), falling back to defaults
    /// when the file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Apply overrides on top of the file values. `None` leaves the file value in place.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.chat_url.filter(|s| !s.trim().is_empty()) {
            self.chat.webhook_url = Some(url);
        }
        if let Some(url) = overrides.upload_url.filter(|s| !s.trim().is_empty()) {
            self.upload.webhook_url = Some(url);
        }
    }

    /// Validate the merged configuration and resolve both endpoint URLs.
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        if self.upload.progress_step == 0 {
            return Err(ConfigError::InvalidProgress(
                "progress_step must be at least 1".to_string(),
            ));
        }
        if !(1..=99).contains(&self.upload.progress_cap) {
            return Err(ConfigError::InvalidProgress(format!(
                "progress_cap must be between 1 and 99, got {}",
                self.upload.progress_cap
            )));
        }

        Ok(Endpoints {
            chat: parse_webhook_url("chat", self.chat.webhook_url.as_deref())?,
            upload: parse_webhook_url("upload", self.upload.webhook_url.as_deref())?,
        })
    }

    /// Directory holding the config and log files.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".hookdesk")
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Default path to the log file.
    pub fn log_path() -> PathBuf {
        Self::home_dir().join("hookdesk.log")
    }
}

fn parse_webhook_url(which: &'static str, raw: Option<&str>) -> Result<Url, ConfigError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingUrl(which))?;
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        which,
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            which,
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
