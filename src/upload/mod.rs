// ABOUTME: Upload module: file records, simulated progress, per-file webhook jobs.
// ABOUTME: Session state lives in session.rs; selection.rs turns typed or pasted paths into files.

pub mod progress;
pub mod selection;
pub mod session;

pub use progress::{ProgressTicker, run_job};
pub use selection::{SelectedFile, resolve_selection};
pub use session::*;

/// Human-readable size using 1024-based units, at most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
