//! # Rating Input
//!
//! Conversion of the free-text rating typed into the add-store form.
//!
//! The lenient path ([`coerce_rating`]) never fails: it reads the longest
//! leading decimal number and falls back to `0.0` when there is none. The
//! strict path ([`parse_rating_strict`]) accepts only a complete, finite
//! number.

use thiserror::Error;

/// Errors from [`parse_rating_strict`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingInputError {
    #[error("rating is required")]
    Empty,

    #[error("rating '{0}' is not a number")]
    NotANumber(String),

    #[error("rating '{0}' is not a finite number")]
    NotFinite(String),
}

/// Leniently coerce a rating string to a number.
///
/// Leading whitespace is skipped and the longest decimal prefix is used, so
/// `"3.7"` and `"3.7 stars"` both give `3.7`. Empty, non-numeric, zero or
/// non-finite input gives `0.0`.
pub fn coerce_rating(raw: &str) -> f64 {
    let prefix = numeric_prefix(raw.trim_start());
    match prefix.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parse a rating string, rejecting anything that is not entirely a finite
/// number.
pub fn parse_rating_strict(raw: &str) -> Result<f64, RatingInputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RatingInputError::Empty);
    }
    if numeric_prefix(trimmed).len() != trimmed.len() {
        return Err(RatingInputError::NotANumber(trimmed.to_string()));
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| RatingInputError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(RatingInputError::NotFinite(trimmed.to_string()));
    }
    Ok(value)
}

/// Longest prefix of `s` shaped like `[+-]digits[.digits][(e|E)[+-]digits]`.
///
/// Returns an empty string when `s` does not start with a number.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(|b| b.is_ascii_digit());

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while is_digit(end) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while is_digit(frac_end) {
            frac_end += 1;
        }
        let frac_digits = frac_end - frac_start;
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }

    if digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while is_digit(exp_end) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

// =============================================================================
// TESTS
// =============================================================================
