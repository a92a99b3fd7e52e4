//! User profile types
//!
//! Profile records are owned by the remote document store and keyed by the
//! identity handle. Every field carries a safe default so partially-written
//! or legacy documents never fail deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::GUEST_DISPLAY_NAME;

/// Role assigned to a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Default, non-privileged role. Guests and upgraded guests always
    /// start here.
    #[default]
    Student,
    Tutor,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Tutor => write!(f, "tutor"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// Persistent user profile stored in the remote document store.
///
/// `id` equals the identity handle exactly; there is no indirection table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    /// May be empty for records created before email capture.
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_created_at")]
    pub created_at: DateTime<Utc>,
}

fn default_created_at() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl Profile {
    /// Build a fresh profile at creation time (sign-up or guest upgrade).
    #[must_use]
    pub fn new(id: String, email: String, name: String, role: Role) -> Self {
        Self { id, email, name, role, avatar_url: None, created_at: Utc::now() }
    }
}

/// Local-only guest session. Never persisted to the profile store until
/// the guest upgrades to a permanent account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestSession {
    /// Identity handle issued by the identity service.
    pub id: String,
    pub name: String,
    /// Fixed to [`Role::Student`] for every guest.
    pub role: Role,
}

impl GuestSession {
    /// Create a guest session for the given identity handle.
    #[must_use]
    pub fn new(id: String, name: Option<String>) -> Self {
        Self {
            id,
            name: name.unwrap_or_else(|| GUEST_DISPLAY_NAME.to_string()),
            role: Role::Student,
        }
    }
}

/// Advisory session cache entry.
///
/// Written only by the session reconciler, read only to pre-seed UI before
/// the authoritative session resolves. Never used to construct a
/// [`crate::Session`] or to gate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CachedSession {
    pub role: Role,
    pub is_anonymous: bool,
}
