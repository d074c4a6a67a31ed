// ABOUTME: Chat module: the message log and the one-request-at-a-time send workflow.
// ABOUTME: The TUI drives it; the webhook module carries the request.

pub mod session;

pub use session::*;
