// ABOUTME: Tracing setup. The TUI owns the terminal, so log records go to a file.
// ABOUTME: RUST_LOG takes precedence; otherwise info, or debug for hookdesk with --verbose.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Default filter when RUST_LOG is unset.
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "info,hookdesk=debug" } else { "info" }
}

/// Install the global subscriber writing to `path`, appending across sessions.
pub fn init(path: &Path, verbose: bool) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
