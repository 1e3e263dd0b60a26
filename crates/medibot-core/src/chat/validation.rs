//! Chat message validation.

use medibot_types::error::ValidationError;

/// Validate a raw `msg` field and return the trimmed message.
///
/// Checks run in order and stop at the first failure:
/// 1. missing or empty raw value
/// 2. trimmed length above `max_chars`
/// 3. trimmed length below `min_chars`
///
/// Lengths are counted in characters, not bytes. A whitespace-only message
/// is not empty, it is too short.
pub fn validate_message(
    raw: Option<&str>,
    min_chars: usize,
    max_chars: usize,
) -> Result<String, ValidationError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(ValidationError::Empty),
    };

    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len > max_chars {
        return Err(ValidationError::TooLong { len, max: max_chars });
    }
    if len < min_chars {
        return Err(ValidationError::TooShort { len, min: min_chars });
    }

    Ok(trimmed.to_string())
}
