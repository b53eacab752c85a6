//! Input validation utilities
//!
//! Normalizes chat messages before matching or forwarding.

use crate::error::RequestError;

/// Trim the message and cap it at `max_chars` characters.
///
/// Empty (or whitespace-only) messages are rejected.
pub fn normalize_message(raw: &str, max_chars: usize) -> Result<String, RequestError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RequestError::EmptyMessage);
    }
    Ok(truncate_chars(trimmed, max_chars).to_string())
}

/// Cut at a character boundary, never mid code point
pub fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &input[..byte_index],
        None => input,
    }
}
