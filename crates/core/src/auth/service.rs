//! Auth service - user-invoked authentication flows
//!
//! Orchestrates the identity gateway and profile store for the explicit
//! flows (login, sign-up, anonymous sign-in, guest upgrade, sign-out).
//! The passive counterpart reacting to identity observations lives in
//! [`crate::session::SessionReconciler`].

use std::sync::Arc;

use studyloop_domain::{AuthError, GuestSession, Identity, Profile, Result, Role};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use super::ports::{IdentityGateway, ProfileStore, SessionCache};
use super::validation;

/// User-invoked auth flows.
///
/// Mutual exclusion between concurrent sign-up/upgrade attempts is a UI
/// responsibility (the triggering action is disabled while loading); the
/// service itself only sequences the remote calls of a single flow.
pub struct AuthService {
    gateway: Arc<dyn IdentityGateway>,
    profiles: Arc<dyn ProfileStore>,
    /// Cleared on sign-out only. The reconciler is the cache's single
    /// writer; these flows trigger it indirectly through the identity
    /// observation stream.
    cache: Arc<dyn SessionCache>,
    /// Name the active guest supplied at anonymous sign-in, carried over
    /// to the profile created at upgrade.
    guest_name: RwLock<Option<String>>,
}

impl AuthService {
    /// Create a new auth service over the given ports.
    pub fn new(
        gateway: Arc<dyn IdentityGateway>,
        profiles: Arc<dyn ProfileStore>,
        cache: Arc<dyn SessionCache>,
    ) -> Self {
        Self { gateway, profiles, cache, guest_name: RwLock::new(None) }
    }

    /// Sign in with email and password and load the matching profile.
    ///
    /// An identity whose profile document was deleted out-of-band fails
    /// with `ProfileMissing`; the identity is signed back out first so the
    /// observable session returns to absent instead of a stale guest-like
    /// state.
    ///
    /// # Errors
    /// `InvalidInput`, `InvalidCredentials`, `AccountNotFound`, `Network`,
    /// `ProfileMissing`, `ProfileMalformed`.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Profile> {
        validation::validate_email(email)?;
        validation::validate_password_present(password)?;

        let identity = self.gateway.sign_in(email, password).await?;

        match self.profiles.read_profile(&identity.uid).await? {
            Some(profile) => {
                info!(uid = %identity.uid, role = %profile.role, "login resolved profile");
                Ok(profile)
            }
            None => {
                warn!(uid = %identity.uid, "login found no profile document, signing back out");
                if let Err(err) = self.gateway.sign_out().await {
                    warn!(error = %err, "sign-out after missing profile failed");
                }
                Err(AuthError::ProfileMissing(identity.uid))
            }
        }
    }

    /// Create a new account and its profile document.
    ///
    /// Sequence: create identity, set display name, write the profile with
    /// a full replace, then read it back. The read-back is what the caller
    /// gets; an empty or malformed read-back fails the whole sign-up even
    /// though the identity and remote profile both exist by then.
    ///
    /// # Errors
    /// `InvalidInput`, `EmailAlreadyInUse`, `WeakPassword`, `Network`,
    /// `ProfileMissing`, `ProfileMalformed`.
    #[instrument(skip(self, password), fields(email = %email, role = %role))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<Profile> {
        validation::validate_email(email)?;
        validation::validate_new_password(password)?;
        validation::validate_display_name(name)?;

        let identity = self.gateway.sign_up(email, password).await?;
        self.gateway.set_display_name(name).await?;

        let profile = Profile::new(identity.uid.clone(), email.to_string(), name.to_string(), role);
        self.create_profile_checked(&identity, profile).await
    }

    /// Start an anonymous (guest) session.
    ///
    /// Never touches the profile store: anonymous identities have no
    /// profile document until upgraded.
    ///
    /// # Errors
    /// `InvalidInput` when consent is withheld (checked before any remote
    /// call), `Network`, `OperationNotAllowed`.
    #[instrument(skip(self))]
    pub async fn sign_in_anonymous(
        &self,
        name: Option<String>,
        consent: bool,
    ) -> Result<GuestSession> {
        if !consent {
            return Err(AuthError::InvalidInput("guest mode requires consent".into()));
        }

        let identity = self.gateway.sign_in_anonymous().await?;
        let guest = GuestSession::new(identity.uid.clone(), name);

        *self.guest_name.write().await = Some(guest.name.clone());

        info!(uid = %identity.uid, "anonymous session started");
        Ok(guest)
    }

    /// Upgrade the active anonymous identity to a permanent account.
    ///
    /// The identity handle is preserved across the upgrade - continuity of
    /// any data keyed by the old anonymous id is the whole reason this
    /// exists instead of a fresh sign-up. The created profile defaults to
    /// [`Role::Student`] (product policy).
    ///
    /// # Errors
    /// `InvalidInput`, `OperationNotAllowed` when no anonymous session is
    /// active, `EmailAlreadyInUse`, `CredentialMismatch`, `Network`,
    /// `ProfileMissing`, `ProfileMalformed`.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn upgrade(&self, email: &str, password: &str) -> Result<Profile> {
        validation::validate_email(email)?;
        validation::validate_new_password(password)?;

        let current = self
            .gateway
            .current_identity()
            .ok_or_else(|| AuthError::OperationNotAllowed("no active session to upgrade".into()))?;
        if !current.is_anonymous {
            return Err(AuthError::OperationNotAllowed(
                "only anonymous sessions can be upgraded".into(),
            ));
        }

        let identity = self.gateway.link_credential(email, password).await?;
        if identity.uid != current.uid {
            error!(expected = %current.uid, got = %identity.uid, "credential link changed the identity handle");
            return Err(AuthError::Internal("identity handle changed during credential link".into()));
        }

        let name = self
            .guest_name
            .read()
            .await
            .clone()
            .unwrap_or_else(|| GuestSession::new(identity.uid.clone(), None).name);

        let profile = Profile::new(identity.uid.clone(), email.to_string(), name, Role::Student);
        let profile = self.create_profile_checked(&identity, profile).await?;

        *self.guest_name.write().await = None;
        Ok(profile)
    }

    /// Sign out.
    ///
    /// The local session always clears; a failed remote revocation is
    /// logged and swallowed so the caller sees success either way.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<()> {
        if let Err(err) = self.cache.clear().await {
            warn!(error = %err, "failed to clear session cache on sign-out");
        }
        *self.guest_name.write().await = None;

        self.gateway.sign_out().await?;
        info!("signed out");
        Ok(())
    }

    /// Write the profile, then read it back to confirm the round trip.
    ///
    /// A failed write or an empty read-back leaves an orphaned identity
    /// behind; no compensating delete is performed (accepted gap), so the
    /// orphan is logged at error level for manual reconciliation.
    async fn create_profile_checked(
        &self,
        identity: &Identity,
        profile: Profile,
    ) -> Result<Profile> {
        if let Err(err) = self.profiles.write_profile(&profile, false).await {
            error!(uid = %identity.uid, error = %err, "profile write failed, identity is orphaned");
            return Err(err);
        }

        match self.profiles.read_profile(&identity.uid).await {
            Ok(Some(profile)) => {
                info!(uid = %identity.uid, "profile created and verified");
                Ok(profile)
            }
            Ok(None) => {
                error!(uid = %identity.uid, "profile read-back came up empty, identity is orphaned");
                Err(AuthError::ProfileMissing(identity.uid.clone()))
            }
            Err(err) => {
                error!(uid = %identity.uid, error = %err, "profile read-back failed, identity is orphaned");
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}
