//! Auth view model
//!
//! The binding surface for a UI shell. Session state comes straight from
//! the reconciler's watch channel; the view model adds a parallel UI
//! state channel (loading flag plus the current notice) and wraps every
//! user-invoked flow so failures surface as user-facing notices instead
//! of raw errors.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use studyloop_core::AuthService;
use studyloop_domain::{CachedSession, GuestSession, Profile, Result, Role, SessionState};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::messages;

/// A message for the user, attached to the UI state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Dismissible; the user can carry on.
    Transient(String),
    /// The current screen cannot proceed; retry guidance included.
    Blocking(String),
}

impl Notice {
    /// The text to display.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Transient(message) | Self::Blocking(message) => message,
        }
    }

    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Blocking(_))
    }
}

/// Observable UI state, separate from the session itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// An action is in flight; the triggering control should be disabled.
    pub loading: bool,
    /// The notice to show, if any.
    pub notice: Option<Notice>,
}

/// View model over the auth flows and the reconciled session.
///
/// Cloning is cheap and all clones share the same UI state channel.
#[derive(Clone)]
pub struct AuthViewModel {
    service: Arc<AuthService>,
    session_rx: watch::Receiver<SessionState>,
    cached: Option<CachedSession>,
    ui_tx: watch::Sender<UiState>,
}

impl AuthViewModel {
    /// Create a view model over the service and a session subscription.
    ///
    /// `cached` is the advisory entry loaded once at startup; it seeds
    /// the first render and is never updated afterwards (the resolved
    /// session supersedes it).
    #[must_use]
    pub fn new(
        service: Arc<AuthService>,
        session_rx: watch::Receiver<SessionState>,
        cached: Option<CachedSession>,
    ) -> Self {
        let (ui_tx, _) = watch::channel(UiState::default());
        Self { service, session_rx, cached, ui_tx }
    }

    /// Subscribe to the reconciled session state.
    #[must_use]
    pub fn session(&self) -> watch::Receiver<SessionState> {
        self.session_rx.clone()
    }

    /// Subscribe to the UI state (loading flag and current notice).
    #[must_use]
    pub fn ui_state(&self) -> watch::Receiver<UiState> {
        self.ui_tx.subscribe()
    }

    /// The advisory cache entry loaded at startup, available before the
    /// first session resolution. Hints only; never authoritative.
    #[must_use]
    pub fn cached_session(&self) -> Option<CachedSession> {
        self.cached
    }

    /// Clear the current notice, keeping the rest of the UI state.
    pub fn dismiss_notice(&self) {
        self.ui_tx.send_if_modified(|state| {
            if state.notice.is_some() {
                state.notice = None;
                true
            } else {
                false
            }
        });
    }

    /// Sign in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Profile> {
        self.run("login", self.service.login(email, password)).await
    }

    /// Create a new account.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<Profile> {
        self.run("sign_up", self.service.sign_up(email, password, name, role)).await
    }

    /// Start an anonymous session.
    pub async fn sign_in_anonymous(
        &self,
        name: Option<String>,
        consent: bool,
    ) -> Result<GuestSession> {
        self.run("sign_in_anonymous", self.service.sign_in_anonymous(name, consent)).await
    }

    /// Upgrade the active anonymous session to a permanent account.
    pub async fn upgrade(&self, email: &str, password: &str) -> Result<Profile> {
        self.run("upgrade", self.service.upgrade(email, password)).await
    }

    /// Sign out.
    pub async fn sign_out(&self) -> Result<()> {
        self.run("sign_out", self.service.sign_out()).await
    }

    /// Run one user-invoked flow, publishing loading and notice updates.
    ///
    /// Starting a flow clears any previous notice. Failures map to a
    /// notice through the message table; a cancelled flow publishes
    /// nothing beyond clearing the loading flag.
    async fn run<T>(
        &self,
        action: &'static str,
        operation: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        self.ui_tx.send_replace(UiState { loading: true, notice: None });

        let started = Instant::now();
        let result = operation.await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => {
                info!(action, duration_ms, "auth_action_success");
                self.ui_tx.send_replace(UiState::default());
            }
            Err(err) => {
                warn!(action, duration_ms, label = err.label(), "auth_action_failure");
                self.ui_tx
                    .send_replace(UiState { loading: false, notice: messages::notice_for(err) });
            }
        }

        result
    }
}

impl std::fmt::Debug for AuthViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthViewModel").field("cached", &self.cached).finish_non_exhaustive()
    }
}
