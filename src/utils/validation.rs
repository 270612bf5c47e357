//! Field checks shared by the create/update forms. Each helper returns the
//! message shown to the user for the first field that fails.

use std::str::FromStr;

use validator::ValidateEmail;

use crate::error::AppError;

pub const CONTACT_DIGITS: usize = 10;
pub const MAX_NAME_LEN: usize = 128;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Trimmed, non-empty text within `max_len` characters.
pub fn required_text(value: &str, message: &str, max_len: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(message));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{} characters at most, got {}",
            max_len,
            value.chars().count()
        )));
    }
    Ok(value.to_string())
}

/// Exactly ten ASCII digits, e.g. `0771234567`.
pub fn contact(value: &str, message: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.len() == CONTACT_DIGITS && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(value.to_string())
    } else {
        Err(AppError::validation(message))
    }
}

pub fn email(value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.validate_email() {
        Ok(value.to_string())
    } else {
        Err(AppError::validation(
            "Enter a valid email address (e.g., user@mail.com).",
        ))
    }
}

/// Parses one of a fixed set of choices (role, gender, membership type).
pub fn choice<T: FromStr>(value: Option<&str>, message: &str) -> Result<T, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::validation(message))
}

/// Whole number greater than zero that fits the column.
pub fn positive(value: Option<i64>, message: &str) -> Result<u32, AppError> {
    value
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| AppError::validation(message))
}

/// Whole number, zero allowed.
pub fn non_negative(value: i64, message: &str) -> Result<u32, AppError> {
    u32::try_from(value).map_err(|_| AppError::validation(message))
}
