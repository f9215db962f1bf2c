//! Field-level validation helpers.
//!
//! Parameter structs call these before any entity is committed, so a
//! rejected value never leaves partially applied state behind. Lengths are
//! counted in characters, not bytes.

use crate::error::{Error, Result};

/// Rejects an empty or whitespace-only string.
///
/// # Errors
/// Returns `OutOfRange` naming `field` when blank.
pub fn non_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::out_of_range(field, "must not be blank"));
    }
    Ok(())
}

/// Rejects a string whose character count falls outside `min ..= max`.
///
/// Blank strings are rejected regardless of `min`.
///
/// # Errors
/// Returns `OutOfRange` naming `field`.
pub fn length_between(field: &'static str, value: &str, min: usize, max: usize) -> Result<()> {
    non_blank(field, value)?;
    let len = value.chars().count();
    if len < min || len > max {
        return Err(Error::out_of_range(
            field,
            format!("length must be between {min} and {max} characters"),
        ));
    }
    Ok(())
}

/// Validates a phone number: an optional `+`, a first digit `1`-`9`, then
/// one to fourteen further digits.
///
/// # Errors
/// Returns `OutOfRange` naming `field`.
pub fn phone_number(field: &'static str, value: &str) -> Result<()> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    let mut rest = digits.chars();
    let lead_ok = matches!(rest.next(), Some('1'..='9'));
    let tail = rest.as_str();
    let tail_ok = (1..=14).contains(&tail.len()) && tail.chars().all(|c| c.is_ascii_digit());
    if !lead_ok || !tail_ok {
        return Err(Error::out_of_range(
            field,
            "must be an international phone number such as +48123456789",
        ));
    }
    Ok(())
}

/// Validates a postal code: 1 to 20 characters, limited to uppercase
/// letters, digits, spaces, and hyphens.
///
/// # Errors
/// Returns `OutOfRange` naming `field`.
pub fn postal_code(field: &'static str, value: &str) -> Result<()> {
    let len = value.chars().count();
    let charset_ok = value
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == ' ' || c == '-');
    if len == 0 || len > 20 || !charset_ok {
        return Err(Error::out_of_range(
            field,
            "must be 1 to 20 characters of uppercase letters, digits, spaces, or hyphens",
        ));
    }
    Ok(())
}

/// Rejects a collection smaller than `min` items.
///
/// # Errors
/// Returns `OutOfRange` naming `field`.
pub fn min_items<T>(field: &'static str, items: &[T], min: usize) -> Result<()> {
    if items.len() < min {
        return Err(Error::out_of_range(
            field,
            format!("must contain at least {min} item(s)"),
        ));
    }
    Ok(())
}
