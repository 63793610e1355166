//! Char-indexed text input used for the Insert-mode draft and the candidate editor.

use std::time::Instant;

/// A string being typed, with a cursor between chars.
#[derive(Debug, Clone)]
pub struct TextInput {
    chars: Vec<char>,
    /// Insertion point, `0..=chars.len()`.
    cursor: usize,
    /// When the content last changed; drives the idle commit.
    pub last_edit: Instant,
}

impl TextInput {
    /// Starts with `text` and the cursor at its end.
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor, last_edit: Instant::now() }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn char_len(&self) -> usize {
        self.chars.len()
    }

    pub fn insert_char(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
        self.touch();
    }

    /// Inserts pasted text at the cursor. Carriage returns are normalised away.
    pub fn insert_str(&mut self, s: &str) {
        let normalized = s.replace("\r\n", "\n").replace('\r', "\n");
        let tail = self.chars.split_off(self.cursor);
        self.chars.extend(normalized.chars());
        self.cursor = self.chars.len();
        self.chars.extend(tail);
        self.touch();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        self.touch();
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
            self.touch();
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    /// Moves to the start of the current line.
    pub fn move_home(&mut self) {
        while self.cursor > 0 && self.chars[self.cursor - 1] != '\n' {
            self.cursor -= 1;
        }
    }

    /// Moves to the end of the current line.
    pub fn move_end(&mut self) {
        while self.cursor < self.chars.len() && self.chars[self.cursor] != '\n' {
            self.cursor += 1;
        }
    }

    fn touch(&mut self) {
        self.last_edit = Instant::now();
    }
}
