// ABOUTME: Library root for hookdesk: re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod chat;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod tui;
pub mod upload;
pub mod webhook;
