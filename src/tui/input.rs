// ABOUTME: Single-pane text input buffer with a UTF-8 safe character cursor.
// ABOUTME: Both the chat and upload panes own one; key events edit the focused buffer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Default, Clone)]
pub struct InputBuffer {
    value: String,
    /// Cursor position in characters, not bytes.
    cursor_pos: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    /// Replace the contents and move the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor_pos = self.char_len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_pos = 0;
    }

    /// Take the contents, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        self.cursor_pos = 0;
        std::mem::take(&mut self.value)
    }

    /// Apply an editing key. Returns false for keys the buffer does not handle.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.cursor_pos = 0,
            KeyCode::End => self.cursor_pos = self.char_len(),
            _ => return false,
        }
        true
    }

    /// Insert a character at the cursor and advance by one character.
    pub fn insert_char(&mut self, c: char) {
        self.clamp_cursor();
        let idx = self.cursor_byte_index();
        self.value.insert(idx, c);
        self.cursor_pos += 1;
    }

    /// Insert a string at the cursor, e.g. from a paste.
    pub fn insert_str(&mut self, s: &str) {
        self.clamp_cursor();
        let idx = self.cursor_byte_index();
        self.value.insert_str(idx, s);
        self.cursor_pos += s.chars().count();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }
        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.value, self.cursor_pos - 1);
        self.value.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.char_len() {
            return;
        }
        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.value, self.cursor_pos + 1);
        self.value.replace_range(start..end, "");
    }

    pub fn move_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.char_len() {
            self.cursor_pos += 1;
        }
    }

    /// Display width of the text before the cursor.
    pub fn visual_cursor_col(&self) -> usize {
        let prefix: String = self.value.chars().take(self.cursor_pos).collect();
        UnicodeWidthStr::width(prefix.as_str())
    }

    /// The slice of the value that fits in `width` columns with the cursor visible,
    /// and the cursor column within that slice.
    pub fn visible_window(&self, width: usize) -> (String, usize) {
        let width = width.max(1);
        let col = self.visual_cursor_col();
        if col < width {
            return (self.value.clone(), col);
        }
        // Drop leading characters until the cursor fits on screen.
        let mut skipped = 0;
        let mut chars = self.value.chars();
        while col - skipped >= width {
            match chars.next() {
                Some(c) => skipped += unicode_width::UnicodeWidthChar::width(c).unwrap_or(0),
                None => break,
            }
        }
        (chars.collect(), col - skipped)
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.char_len());
    }

    fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.value, self.cursor_pos)
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }
    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_appends_at_cursor() {
        let mut input = InputBuffer::new();
        for c in "helo".chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Char('l')));
        assert_eq!(input.value(), "hello");
        assert_eq!(input.cursor_pos(), 4);
    }

    #[test]
    fn utf8_editing_is_safe() {
        let mut input = InputBuffer::new();
        input.insert_char('a');
        input.insert_char('🙂');
        input.insert_char('é');
        assert_eq!(input.value(), "a🙂é");
        assert_eq!(input.cursor_pos(), 3);

        input.move_left();
        input.backspace();
        assert_eq!(input.value(), "aé");
        assert_eq!(input.cursor_pos(), 1);

        input.delete();
        assert_eq!(input.value(), "a");
        assert_eq!(input.cursor_pos(), 1);
    }

    #[test]
    fn home_end_and_bounds() {
        let mut input = InputBuffer::new();
        input.set_value("abc");
        input.handle_key(key(KeyCode::Home));
        input.backspace();
        assert_eq!(input.value(), "abc");
        input.handle_key(key(KeyCode::End));
        input.delete();
        assert_eq!(input.value(), "abc");
        input.move_right();
        assert_eq!(input.cursor_pos(), 3);
    }

    #[test]
    fn insert_str_moves_cursor_past_paste() {
        let mut input = InputBuffer::new();
        input.set_value("ad");
        input.move_left();
        input.insert_str("bc");
        assert_eq!(input.value(), "abcd");
        assert_eq!(input.cursor_pos(), 3);
    }

    #[test]
    fn take_empties_buffer() {
        let mut input = InputBuffer::new();
        input.set_value("send me");
        assert_eq!(input.take(), "send me");
        assert!(input.is_empty());
        assert_eq!(input.cursor_pos(), 0);
    }

    #[test]
    fn control_chords_are_not_consumed() {
        let mut input = InputBuffer::new();
        let handled = input.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert!(!handled);
        assert!(input.is_empty());
    }

    #[test]
    fn visible_window_keeps_cursor_on_screen() {
        let mut input = InputBuffer::new();
        input.set_value("0123456789");
        let (text, col) = input.visible_window(4);
        assert_eq!(col, 3);
        assert_eq!(text, "789");

        input.handle_key(key(KeyCode::Home));
        let (text, col) = input.visible_window(4);
        assert_eq!(col, 0);
        assert_eq!(text, "0123456789");
    }

    #[test]
    fn visual_col_counts_wide_chars() {
        let mut input = InputBuffer::new();
        input.set_value("日本");
        assert_eq!(input.visual_cursor_col(), 4);
    }
}
