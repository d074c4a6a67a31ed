// ABOUTME: Chat widget: renders chat messages into styled ratatui Lines.
// ABOUTME: User and bot messages get distinct prefixes; a pending reply shows a typing line.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::chat::{ChatMessage, Sender};

/// Render the chat log, followed by a typing indicator while a reply is pending.
pub fn render_chat_lines(messages: &[ChatMessage], awaiting_response: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let dim = Style::default().fg(Color::DarkGray);

    for (idx, msg) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        let (prefix, prefix_style) = match msg.sender {
            Sender::User => (
                "❯ ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Sender::Bot => (
                "⏺ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        };
        let time = msg.timestamp.format("%H:%M").to_string();

        // First line gets the prefix and time, continuation lines are indented.
        for (i, text) in msg.content.split('\n').enumerate() {
            if i == 0 {
                lines.push(Line::from(vec![
                    Span::styled(prefix, prefix_style),
                    Span::raw(text.to_string()),
                    Span::styled(format!("  {}", time), dim),
                ]));
            } else {
                lines.push(Line::from(Span::raw(format!("  {}", text))));
            }
        }
    }

    if awaiting_response {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            Span::styled(
                "⏺ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "…",
                dim.add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    use crate::chat::MessageId;

    fn message(sender: Sender, content: &str) -> ChatMessage {
        ChatMessage {
            id: MessageId(1),
            content: content.to_string(),
            sender,
            timestamp: Local::now(),
        }
    }

    #[test]
    fn user_message_has_green_prefix() {
        let lines = render_chat_lines(&[message(Sender::User, "hello")], false);
        assert_eq!(lines.len(), 1);
        let spans = &lines[0].spans;
        assert_eq!(spans[0].content, "❯ ");
        assert_eq!(spans[0].style.fg, Some(Color::Green));
        assert_eq!(spans[1].content, "hello");
    }

    #[test]
    fn bot_message_has_cyan_prefix() {
        let lines = render_chat_lines(&[message(Sender::Bot, "hi there")], false);
        let spans = &lines[0].spans;
        assert_eq!(spans[0].content, "⏺ ");
        assert_eq!(spans[0].style.fg, Some(Color::Cyan));
    }

    #[test]
    fn multiline_message_is_indented() {
        let lines = render_chat_lines(&[message(Sender::Bot, "line1\nline2\nline3")], false);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].spans[0].content, "  line2");
    }

    #[test]
    fn blank_separator_between_messages() {
        let lines = render_chat_lines(
            &[message(Sender::User, "hi"), message(Sender::Bot, "hello")],
            false,
        );
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].spans.len(), 0);
    }

    #[test]
    fn pending_reply_adds_typing_line() {
        let lines = render_chat_lines(&[message(Sender::User, "hi")], true);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].spans[1].content, "…");
    }
}
