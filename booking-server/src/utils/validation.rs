//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on reasonable UX limits for names, notes and
//! contact fields; the embedded stores enforce no lengths themselves.

use shared::error::AppError;
use shared::models::ContactInfo;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: restaurant, table, location tag, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes and free text (special requests, descriptions)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers and similar
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required_field(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Minimal email shape check: something@something, sane length.
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::validation(format!("Invalid email format: {value}")));
    }
    Ok(())
}

/// Validate the booking wizard's contact step: all four fields required.
pub fn validate_contact(contact: &ContactInfo) -> Result<(), AppError> {
    validate_required_text(&contact.first_name, "first_name", MAX_NAME_LEN)?;
    validate_required_text(&contact.last_name, "last_name", MAX_NAME_LEN)?;
    validate_email(&contact.email)?;
    validate_required_text(&contact.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Table 1", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("john.smith@example.com").is_ok());
        assert!(validate_email("john").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("john@localhost").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("ok".into()), "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(501)), "note", MAX_NOTE_LEN).is_err());
    }
}
