//! User-facing message mapping
//!
//! Every error shown to the user comes from the fixed table below or the
//! generic fallback. Raw backend text never reaches the UI; the only
//! dynamic text shown is our own local validation wording.

use studyloop_domain::AuthError;

use crate::viewmodel::Notice;

const FALLBACK: &str = "Something went wrong. Please try again.";

/// Resolve an error to the text shown to the user.
#[must_use]
pub fn user_message(error: &AuthError) -> String {
    match error {
        // Local validation text is our own wording and safe to show.
        AuthError::InvalidInput(message) => message.clone(),
        other => fixed_message(other).unwrap_or(FALLBACK).to_string(),
    }
}

/// Resolve an error to the notice published on the UI state, if any.
///
/// A cancelled action is not a failure and produces no notice. Only a
/// malformed profile on the authoritative path blocks; everything else
/// is dismissible.
#[must_use]
pub fn notice_for(error: &AuthError) -> Option<Notice> {
    match error {
        AuthError::Cancelled => None,
        AuthError::ProfileMalformed(_) => Some(Notice::Blocking(user_message(error))),
        other => Some(Notice::Transient(user_message(other))),
    }
}

fn fixed_message(error: &AuthError) -> Option<&'static str> {
    match error {
        AuthError::InvalidCredentials => Some("Incorrect email or password."),
        AuthError::AccountNotFound => Some("No account exists for that email."),
        AuthError::EmailAlreadyInUse => Some("That email address is already in use."),
        AuthError::WeakPassword => Some("Passwords must be at least 8 characters long."),
        AuthError::CredentialMismatch => {
            Some("Those credentials could not be linked to this account.")
        }
        AuthError::Network(_) => Some("Connection problem. Check your network and try again."),
        AuthError::OperationNotAllowed(_) => Some("That action is not available right now."),
        AuthError::ProfileMissing(_) => {
            Some("Your account has no profile yet. Please contact support.")
        }
        AuthError::ProfileMalformed(_) => {
            Some("Your profile could not be loaded. Retry, and contact support if this keeps happening.")
        }
        _ => None,
    }
}
