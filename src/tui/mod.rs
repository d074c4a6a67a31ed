// ABOUTME: TUI module: ratatui full-screen interface for hookdesk.
// ABOUTME: Chat pane and upload pane side by side, notices, and a status bar.

pub mod events;
pub mod input;
pub mod model;
pub mod state;
pub mod ui;
pub mod widgets;

pub use state::*;
