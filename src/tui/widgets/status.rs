// ABOUTME: Status bar widget: endpoint hosts, in-flight work, focus hint, and session time.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use std::time::Instant;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::tui::state::Focus;

/// Parameters for rendering the status bar.
pub struct StatusBarParams<'a> {
    pub chat_host: &'a str,
    pub upload_host: &'a str,
    pub awaiting_response: bool,
    pub uploads_in_flight: usize,
    pub focus: Focus,
    pub session_start: Instant,
}

pub fn status_line(params: &StatusBarParams) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(
            format!(" chat → {} ", params.chat_host),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled("| ", dim),
        Span::styled(
            format!("files → {} ", params.upload_host),
            Style::default().fg(Color::Cyan),
        ),
    ];

    if params.awaiting_response {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled("waiting for reply ", Style::default().fg(Color::Yellow)));
    }
    if params.uploads_in_flight > 0 {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(
            format!("{} uploading ", params.uploads_in_flight),
            Style::default().fg(Color::Yellow),
        ));
    }

    let hint = match params.focus {
        Focus::Chat => "Tab: files",
        Focus::Upload => "Tab: chat",
    };
    spans.push(Span::styled("| ", dim));
    spans.push(Span::styled(format!("{} ", hint), dim));
    spans.push(Span::styled("| ", dim));
    spans.push(Span::styled(
        format_elapsed(params.session_start.elapsed().as_secs()),
        Style::default().fg(Color::White),
    ));

    Line::from(spans)
}

/// Format elapsed seconds as `Xm YYs`, or `Xh YYm` past an hour.
pub fn format_elapsed(secs: u64) -> String {
    if secs >= 3600 {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}
