// ABOUTME: Page composition: header, chat pane and upload pane side by side, notices, status bar.
// ABOUTME: Splits the terminal frame into layout chunks and delegates to widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::tui::input::InputBuffer;
use crate::tui::model::DeskApp;
use crate::tui::state::Focus;
use crate::tui::widgets::chat::render_chat_lines;
use crate::tui::widgets::notices::notice_lines;
use crate::tui::widgets::status::{StatusBarParams, status_line};
use crate::tui::widgets::uploads::{render_upload_lines, upload_zone_lines};

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, app: &mut DeskApp) {
    let area = frame.area();
    let notice_height = app.notices.len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Header
            Constraint::Min(6),                // Panes
            Constraint::Length(notice_height), // Notices
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    let header = Line::from(vec![
        Span::styled(
            " hookdesk",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  AI Assistant Chat · upload files to your workflow",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
        .split(chunks[1]);

    render_chat_pane(frame, app, panes[0]);
    render_upload_pane(frame, app, panes[1]);

    if notice_height > 0 {
        frame.render_widget(Paragraph::new(notice_lines(&app.notices)), chunks[2]);
    }

    let status = status_line(&StatusBarParams {
        chat_host: &app.chat_host,
        upload_host: &app.upload_host,
        awaiting_response: app.chat.awaiting_response(),
        uploads_in_flight: app.uploads.in_flight(),
        focus: app.focus,
        session_start: app.session_start,
    });
    frame.render_widget(Paragraph::new(status), chunks[3]);
}

fn pane_block(title: &'static str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)))
}

fn render_chat_pane(frame: &mut Frame, app: &mut DeskApp, area: Rect) {
    let focused = app.focus == Focus::Chat;
    let block = pane_block(" Chat ", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(inner);

    // Ratatui's own line_count() matches its wrapped rendering exactly.
    let chat_paragraph = Paragraph::new(render_chat_lines(
        app.chat.messages(),
        app.chat.awaiting_response(),
    ))
    .wrap(Wrap { trim: false });
    let total_lines = saturating_u16(chat_paragraph.line_count(rows[0].width));
    let max_scroll = total_lines.saturating_sub(rows[0].height);

    // chat_scroll counts lines up from the bottom; cap it at the top of the content.
    if app.chat_scroll > max_scroll {
        app.chat_scroll = max_scroll;
    }
    let scroll = max_scroll.saturating_sub(app.chat_scroll);
    frame.render_widget(chat_paragraph.scroll((scroll, 0)), rows[0]);

    let title = if app.chat.awaiting_response() {
        " ⚡ waiting for reply... "
    } else {
        " message "
    };
    render_input(frame, &app.chat_input, title, "Type your message...", focused, rows[1]);
}

fn render_upload_pane(frame: &mut Frame, app: &mut DeskApp, area: Rect) {
    let focused = app.focus == Focus::Upload;
    let block = pane_block(" File Upload ", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(inner);

    let zone_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let zone = Paragraph::new(upload_zone_lines(focused, app.uploads.limits().max_file_bytes))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::BOTTOM).border_style(zone_style));
    frame.render_widget(zone, rows[0]);

    let selected = focused.then_some(app.selected_upload);
    let list = Paragraph::new(render_upload_lines(app.uploads.records(), selected));
    let scroll = list_scroll(app.selected_upload, rows[1].height);
    frame.render_widget(list.scroll((scroll, 0)), rows[1]);

    render_input(frame, &app.upload_input, " path or glob ", "e.g. ~/Downloads/*.pdf", focused, rows[2]);
}

/// Rows to scroll the upload list so the selected record is in view.
/// Each record takes two rows after the heading.
fn list_scroll(selected: usize, height: u16) -> u16 {
    let selected_bottom = saturating_u16(selected)
        .saturating_add(1)
        .saturating_mul(2)
        .saturating_add(1);
    selected_bottom.saturating_sub(height)
}

fn saturating_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn render_input(
    frame: &mut Frame,
    input: &InputBuffer,
    title: &'static str,
    placeholder: &'static str,
    focused: bool,
    area: Rect,
) {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(border)
        .title(Span::styled(title, Style::default().fg(Color::DarkGray)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width.max(1) as usize;
    let (visible, cursor_col) = input.visible_window(width);
    let content = if input.is_empty() {
        Span::styled(placeholder, Style::default().fg(Color::DarkGray))
    } else {
        // Newlines from Shift+Enter render as a visible marker on one row.
        Span::raw(visible.replace('\n', "⏎"))
    };
    frame.render_widget(Paragraph::new(content), inner);

    if focused && inner.width > 0 && inner.height > 0 {
        let col = (cursor_col as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(inner.x.saturating_add(col), inner.y));
    }
}
