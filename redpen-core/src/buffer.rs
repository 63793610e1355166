use std::ops::Range;
use std::sync::Arc;

/// The text being edited, addressed in chars.
///
/// A `TextBuffer` is an immutable value. [`TextBuffer::splice`] returns a new
/// buffer and leaves `self` untouched, so history snapshots can share the
/// underlying allocation through the `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: Arc<str>,
    char_len: usize,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into();
        let char_len = text.chars().count();
        Self { text: Arc::from(text), char_len }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in chars; this is the bound every span offset is checked against.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// Byte offset of char `idx`. `idx == char_len` maps to the end of the text.
    /// Returns `None` past the end.
    fn byte_offset(&self, idx: usize) -> Option<usize> {
        if idx == self.char_len {
            return Some(self.text.len());
        }
        self.text.char_indices().nth(idx).map(|(b, _)| b)
    }

    /// The text covered by a char range, or `None` if the range is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Option<&str> {
        if range.start > range.end || range.end > self.char_len {
            return None;
        }
        let start = self.byte_offset(range.start)?;
        let end = self.byte_offset(range.end)?;
        Some(&self.text[start..end])
    }

    /// Returns `buffer[0:start] + replacement + buffer[end:]`, or `None` if the
    /// range does not address this buffer.
    pub fn splice(&self, start: usize, end: usize, replacement: &str) -> Option<TextBuffer> {
        if start > end || end > self.char_len {
            return None;
        }
        let start_b = self.byte_offset(start)?;
        let end_b = self.byte_offset(end)?;
        let capacity = self.text.len() - (end_b - start_b) + replacement.len();
        let mut out = String::with_capacity(capacity);
        out.push_str(&self.text[..start_b]);
        out.push_str(replacement);
        out.push_str(&self.text[end_b..]);
        let char_len = self.char_len - (end - start) + replacement.chars().count();
        Some(TextBuffer { text: Arc::from(out), char_len })
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        TextBuffer::new(s)
    }
}
