//! Pre-flight checks applied to text before it is sent for analysis.

use crate::error::ValidationError;

/// Shortest text the analysis service accepts, in chars.
pub const MIN_TEXT_CHARS: usize = 10;
/// Longest text the analysis service accepts, in chars.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Rejects text that must not reach the network.
///
/// Emptiness and whitespace are checked before length, so `"   "` reports
/// `WhitespaceOnly` rather than `TooShort`. Length is measured on the text as
/// typed (untrimmed).
pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::Empty);
    }
    if text.trim().is_empty() {
        return Err(ValidationError::WhitespaceOnly);
    }
    let len = text.chars().count();
    if len < MIN_TEXT_CHARS {
        return Err(ValidationError::TooShort { len, min: MIN_TEXT_CHARS });
    }
    if len > MAX_TEXT_CHARS {
        return Err(ValidationError::TooLong { len, max: MAX_TEXT_CHARS });
    }
    Ok(())
}
