// ABOUTME: Notice strip: renders live notifications, newest last, colored by severity.
// ABOUTME: Sits between the panes and the status bar, one row per notice.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::notify::{NoticeBoard, Severity};

pub fn notice_lines(board: &NoticeBoard) -> Vec<Line<'static>> {
    board
        .iter()
        .map(|notice| {
            let color = match notice.severity {
                Severity::Info => Color::Blue,
                Severity::Success => Color::Green,
                Severity::Error => Color::Red,
            };
            Line::from(vec![
                Span::styled(" ● ", Style::default().fg(color)),
                Span::styled(
                    format!("{}: ", notice.title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(notice.description.clone()),
            ])
        })
        .collect()
}
