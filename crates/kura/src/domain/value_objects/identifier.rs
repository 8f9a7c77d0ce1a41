//! Shared validation for identifier value objects

use crate::domain::errors::DomainError;

/// Upper bound on identifier length
pub(crate) const MAX_IDENTIFIER_LEN: usize = 128;

/// Validate a raw identifier and return it in owned form.
///
/// Accepts ASCII letters, digits, `-` and `_`, which covers UUIDs as well
/// as short provider-issued ids such as `u-1`.
pub(crate) fn validate(kind: &str, raw: &str) -> Result<String, DomainError> {
    if raw.trim().is_empty() {
        return Err(DomainError::InvalidIdentifier(format!("{kind} must not be empty")));
    }

    if raw.len() > MAX_IDENTIFIER_LEN {
        return Err(DomainError::InvalidIdentifier(format!(
            "{kind} exceeds {MAX_IDENTIFIER_LEN} characters"
        )));
    }

    if let Some(c) = raw
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(DomainError::InvalidIdentifier(format!(
            "{kind} contains invalid character {c:?}: {raw}"
        )));
    }

    Ok(raw.to_string())
}
