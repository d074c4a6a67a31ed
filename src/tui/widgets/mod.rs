// ABOUTME: TUI widget sub-modules for the chat log, upload list, notices, and status bar.
// ABOUTME: Each widget is a pure function from state to styled ratatui Lines.

pub mod chat;
pub mod notices;
pub mod status;
pub mod uploads;
