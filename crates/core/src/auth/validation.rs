//! Local input validation
//!
//! Runs before any remote call so blank or obviously malformed input
//! short-circuits with `InvalidInput` instead of a round trip.

use studyloop_domain::constants::MIN_PASSWORD_LEN;
use studyloop_domain::{AuthError, Result};

/// Validate an email address has the minimal shape `local@domain`.
pub fn validate_email(email: &str) -> Result<()> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(AuthError::InvalidInput("email is required".into()));
    }
    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AuthError::InvalidInput("email is not valid".into()));
    }
    Ok(())
}

/// Validate a password for sign-in (presence only; the backend decides
/// whether it matches).
pub fn validate_password_present(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(AuthError::InvalidInput("password is required".into()));
    }
    Ok(())
}

/// Validate a password for account creation or upgrade.
pub fn validate_new_password(password: &str) -> Result<()> {
    validate_password_present(password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a display name is non-blank.
pub fn validate_display_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AuthError::InvalidInput("name is required".into()));
    }
    Ok(())
}
