//! Persona name validation mirroring backend constraints.
//!
//! This module provides validation rules that match the backend's
//! `PersonName` type in `backend/src/domain/user.rs`. Keeping these rules in
//! sync ensures generated names are always valid when consumed by the
//! backend.
//!
//! # Validation Rules
//!
//! - Minimum length: 2 characters
//! - Maximum length: 80 characters
//! - Allowed characters: letters, digits, spaces, hyphens, apostrophes
//! - Must not be whitespace-only

/// Minimum allowed length for a persona name.
pub const PERSONA_NAME_MIN: usize = 2;

/// Maximum allowed length for a persona name.
pub const PERSONA_NAME_MAX: usize = 80;

/// Validates a persona name against backend constraints.
///
/// Returns `true` if the name satisfies all validation rules:
/// - Length between [`PERSONA_NAME_MIN`] and [`PERSONA_NAME_MAX`] characters
/// - Contains only letters, digits, spaces, hyphens, and apostrophes
/// - Is not whitespace-only
///
/// # Examples
///
/// ```
/// use demo_data::is_valid_persona_name;
///
/// assert!(is_valid_persona_name("Ada Lovelace"));
/// assert!(is_valid_persona_name("Jean-Luc"));
/// assert!(is_valid_persona_name("O'Brien"));
/// assert!(!is_valid_persona_name("A"));       // Too short
/// assert!(!is_valid_persona_name("   "));     // Whitespace-only
/// assert!(!is_valid_persona_name("a@b.com")); // Invalid character
/// ```
#[must_use]
pub fn is_valid_persona_name(name: &str) -> bool {
    let length = name.chars().count();
    if !(PERSONA_NAME_MIN..=PERSONA_NAME_MAX).contains(&length) {
        return false;
    }
    // Reject whitespace-only names (mirrors backend's trim().is_empty() check)
    if name.trim().is_empty() {
        return false;
    }
    name.chars().all(is_valid_persona_name_char)
}

/// Returns `true` if the character is allowed in a persona name.
#[must_use]
fn is_valid_persona_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == ' ' || c == '-' || c == '\''
}

/// Builds a lowercase email local part from a persona name.
///
/// Invalid characters collapse to dots; consecutive dots are merged so the
/// result is a plausible address local part. Length is not constrained here.
#[must_use]
pub(crate) fn email_local_part(name: &str) -> String {
    let mut local = String::with_capacity(name.len());
    let mut last_was_dot = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            local.extend(c.to_lowercase());
            last_was_dot = false;
        } else if !last_was_dot && !local.is_empty() {
            local.push('.');
            last_was_dot = true;
        }
    }
    while local.ends_with('.') {
        local.pop();
    }
    local
}
