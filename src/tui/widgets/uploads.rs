// ABOUTME: Upload widget: the drop zone banner and the list of upload records.
// ABOUTME: Uploading records show a progress bar; failed ones show their retry/remove keys.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::upload::{UploadRecord, UploadStatus, format_file_size};

const BAR_WIDTH: usize = 20;

/// The banner at the top of the upload pane. `focused` plays the role of drag hover.
pub fn upload_zone_lines(focused: bool, max_file_bytes: u64) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let title = if focused { "Drop files here" } else { "Upload Files" };
    let title_style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    vec![
        Line::from(Span::styled(title, title_style)),
        Line::from(Span::styled(
            "Drop or paste paths, or type a glob",
            dim,
        )),
        Line::from(Span::styled(
            format!(
                "Maximum file size: {}",
                format_file_size(max_file_bytes).replace(' ', "")
            ),
            dim,
        )),
    ]
}

/// Render each record as a name/size line plus a status line.
pub fn render_upload_lines(records: &[UploadRecord], selected: Option<usize>) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    if records.is_empty() {
        return lines;
    }
    lines.push(Line::from(Span::styled(
        "Uploaded Files",
        Style::default().add_modifier(Modifier::BOLD),
    )));

    for (idx, record) in records.iter().enumerate() {
        let is_selected = selected == Some(idx);
        let marker = if is_selected { "▸ " } else { "  " };
        let (icon, icon_style) = status_icon(record.status);
        let name_style = if is_selected {
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default()
        };

        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(icon, icon_style),
            Span::raw(" "),
            Span::styled(record.name.clone(), name_style),
            Span::styled(format!("  {}", format_file_size(record.size)), dim),
        ]));

        let detail = match record.status {
            UploadStatus::Uploading => Span::styled(
                format!("    {} {:>3}%", progress_bar(record.progress, BAR_WIDTH), record.progress),
                Style::default().fg(Color::Blue),
            ),
            UploadStatus::Success => {
                Span::styled("    uploaded", Style::default().fg(Color::Green))
            }
            UploadStatus::Error => Span::styled(
                "    failed · Ctrl+R retry · Ctrl+X remove",
                Style::default().fg(Color::Red),
            ),
        };
        lines.push(Line::from(detail));
    }

    lines
}

fn status_icon(status: UploadStatus) -> (&'static str, Style) {
    match status {
        UploadStatus::Uploading => ("⟳", Style::default().fg(Color::Blue)),
        UploadStatus::Success => ("✔", Style::default().fg(Color::Green)),
        UploadStatus::Error => ("✖", Style::default().fg(Color::Red)),
    }
}

/// Fixed-width text progress bar.
pub fn progress_bar(progress: u8, width: usize) -> String {
    let filled = (progress.min(100) as usize * width) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
