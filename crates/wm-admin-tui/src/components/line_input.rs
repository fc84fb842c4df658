//! Single-line text input
//!
//! Holds only the cursor; the text itself lives with its owner and is
//! passed in on every call.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Default)]
pub struct LineInput {
    /// Cursor position in chars
    cursor: usize,
}

impl LineInput {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Put the cursor after the last char of `text`
    pub fn move_to_end(&mut self, text: &str) {
        self.cursor = text.chars().count();
    }

    /// Apply an editing key to `text`. Returns false for keys the input
    /// does not handle.
    pub fn handle_key(&mut self, text: &mut String, key: KeyEvent) -> bool {
        self.cursor = self.cursor.min(text.chars().count());
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('u') if ctrl => {
                text.clear();
                self.cursor = 0;
            }
            KeyCode::Char(c) if !ctrl => {
                text.insert(byte_index(text, self.cursor), c);
                self.cursor += 1;
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                text.remove(byte_index(text, self.cursor));
            }
            KeyCode::Delete if self.cursor < text.chars().count() => {
                text.remove(byte_index(text, self.cursor));
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(text.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.move_to_end(text),
            KeyCode::Backspace | KeyCode::Delete => {}
            _ => return false,
        }
        true
    }

    /// Insert `pasted` at the cursor, line breaks dropped
    pub fn insert_str(&mut self, text: &mut String, pasted: &str) {
        self.cursor = self.cursor.min(text.chars().count());
        let clean: String = pasted.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        text.insert_str(byte_index(text, self.cursor), &clean);
        self.cursor += clean.chars().count();
    }
}

fn byte_index(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_insert_and_delete() {
        let mut input = LineInput::default();
        let mut text = String::new();
        for c in "naïve".chars() {
            assert!(input.handle_key(&mut text, key(KeyCode::Char(c))));
        }
        input.handle_key(&mut text, key(KeyCode::Left));
        input.handle_key(&mut text, key(KeyCode::Left));
        input.handle_key(&mut text, key(KeyCode::Backspace));
        assert_eq!(text, "nave");
        assert_eq!(input.cursor(), 2);

        input.handle_key(&mut text, key(KeyCode::Home));
        input.handle_key(&mut text, key(KeyCode::Delete));
        assert_eq!(text, "ave");
    }

    #[test]
    fn test_cursor_clamped_to_external_changes() {
        let mut input = LineInput::default();
        let mut text = "orders".to_string();
        input.move_to_end(&text);
        text = "ab".to_string();
        input.handle_key(&mut text, key(KeyCode::Char('c')));
        assert_eq!(text, "abc");
    }

    #[test]
    fn test_paste_strips_newlines() {
        let mut input = LineInput::default();
        let mut text = "ab".to_string();
        input.handle_key(&mut text, key(KeyCode::Right));
        input.insert_str(&mut text, "x\ny");
        assert_eq!(text, "axyb");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_unhandled_keys() {
        let mut input = LineInput::default();
        let mut text = String::new();
        assert!(!input.handle_key(&mut text, key(KeyCode::Enter)));
        assert!(!input.handle_key(&mut text, key(KeyCode::Esc)));
        assert!(input.handle_key(
            &mut text,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)
        ));
    }
}
