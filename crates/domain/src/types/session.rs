//! Session types
//!
//! A [`Session`] is the reconciled combination of the latest identity
//! observation and a profile store read. It is ephemeral and derived; only
//! the profile half is ever persisted, and only by the profile store.

use serde::{Deserialize, Serialize};

use crate::errors::AuthError;
use crate::types::user::Profile;

/// Opaque handle for an authenticated or anonymous principal, as issued by
/// the external identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    /// Absent for anonymous identities.
    pub email: Option<String>,
    pub is_anonymous: bool,
}

impl Identity {
    /// Credentialed identity.
    #[must_use]
    pub fn new(uid: String, email: String) -> Self {
        Self { uid, email: Some(email), is_anonymous: false }
    }

    /// Anonymous (guest) identity.
    #[must_use]
    pub fn anonymous(uid: String) -> Self {
        Self { uid, email: None, is_anonymous: true }
    }
}

/// Reconciled session value exposed to the UI layer.
///
/// Invariant: a session is only ever surfaced in one of three shapes --
/// signed out (no identity), guest-like (identity without profile), or
/// full (identity with a verified profile). "Signed in with unknown
/// profile" never escapes the reconciliation window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    pub identity: Option<Identity>,
    pub profile: Option<Profile>,
}

impl Session {
    /// The signed-out session.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Identity present, profile verified.
    #[must_use]
    pub fn full(identity: Identity, profile: Profile) -> Self {
        Self { identity: Some(identity), profile: Some(profile) }
    }

    /// Identity present but no profile document exists. Anonymous
    /// identities live here until upgraded.
    #[must_use]
    pub fn guest(identity: Identity) -> Self {
        Self { identity: Some(identity), profile: None }
    }

    #[must_use]
    pub fn is_signed_out(&self) -> bool {
        self.identity.is_none()
    }

    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.identity.is_some() && self.profile.is_none()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.identity.is_some() && self.profile.is_some()
    }
}

/// Observable state of the session reconciler.
///
/// `Unresolved -> Resolving -> Resolved | Failed`. The initial state is
/// `Unresolved` until the first identity observation arrives. A `Failed`
/// state is only left by a new identity observation or an explicit user
/// action; the reconciler never retries on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum SessionState {
    Unresolved,
    Resolving,
    Resolved(Session),
    Failed(AuthError),
}

impl SessionState {
    /// The resolved session, if reconciliation has completed.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Resolved(session) => Some(session),
            _ => None,
        }
    }
}
