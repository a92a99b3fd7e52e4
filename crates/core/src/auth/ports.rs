//! Port interfaces for the auth flows
//!
//! These traits define the boundaries between core business logic and
//! infrastructure implementations. The real adapters talk to the managed
//! identity service and document store; tests substitute in-memory fakes.

use async_trait::async_trait;
use studyloop_domain::{CachedSession, Identity, Profile, Result};
use tokio::sync::watch;

/// Thin adapter around the external identity service.
///
/// Implementations own the one identity-observation channel the system
/// maintains: every authentication-state transition (sign in, sign out,
/// token refresh, credential link) must push the new value through
/// [`IdentityGateway::observe`].
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Authenticate with email and password.
    ///
    /// # Errors
    /// `InvalidCredentials`, `AccountNotFound`, or `Network`.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    /// Create a new credentialed identity.
    ///
    /// # Errors
    /// `EmailAlreadyInUse`, `WeakPassword`, or `Network`.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity>;

    /// Create an anonymous identity.
    ///
    /// # Errors
    /// `Network` or `OperationNotAllowed`.
    async fn sign_in_anonymous(&self) -> Result<Identity>;

    /// Attach a permanent credential to the current anonymous identity,
    /// preserving its handle.
    ///
    /// # Errors
    /// `EmailAlreadyInUse`, `CredentialMismatch`, or `Network`.
    async fn link_credential(&self, email: &str, password: &str) -> Result<Identity>;

    /// Set the display name on the current identity.
    async fn set_display_name(&self, name: &str) -> Result<()>;

    /// Sign out. The local session always clears, even when the remote
    /// revocation fails; remote failures are logged, not surfaced.
    async fn sign_out(&self) -> Result<()>;

    /// Subscribe to identity-state transitions. The receiver's current
    /// value is the latest observed authentication state.
    fn observe(&self) -> watch::Receiver<Option<Identity>>;

    /// Latest observed identity, if any.
    fn current_identity(&self) -> Option<Identity>;
}

/// Thin adapter around the external document store's per-user profile
/// record at `users/{id}`.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Read a profile document. Absence is not an error.
    ///
    /// # Errors
    /// `Network` or `ProfileMalformed`.
    async fn read_profile(&self, id: &str) -> Result<Option<Profile>>;

    /// Write a profile document. `merge = false` replaces the whole
    /// record (creation); `merge = true` merges fields (defensive
    /// re-saves).
    async fn write_profile(&self, profile: &Profile, merge: bool) -> Result<()>;
}

/// Advisory local cache of the active role and anonymous flag.
///
/// Write-through only: written by the reconciler's output, read only to
/// pre-seed UI before the authoritative session resolves. Never read to
/// construct a session and never used to gate writes.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Load the cached entry, if one exists.
    async fn load(&self) -> Result<Option<CachedSession>>;

    /// Overwrite the cached entry.
    async fn store(&self, entry: CachedSession) -> Result<()>;

    /// Remove the cached entry.
    async fn clear(&self) -> Result<()>;
}
