//! Session reconciler - the two-step session state machine
//!
//! Consumes the single identity-observation stream and combines each
//! observation with a profile store read to produce one authoritative,
//! observable session value. Lifecycle follows the explicit worker
//! pattern: the join handle is tracked, cancellation is explicit, and
//! teardown deregisters the listener exactly once.

use std::sync::Arc;
use std::time::Duration;

use studyloop_domain::{AuthError, CachedSession, Identity, Role, Session, SessionState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::auth::ports::{IdentityGateway, ProfileStore, SessionCache};

/// Configuration for the session reconciler.
#[derive(Debug, Clone)]
pub struct SessionReconcilerConfig {
    /// Join timeout when stopping.
    pub join_timeout: Duration,
}

impl Default for SessionReconcilerConfig {
    fn default() -> Self {
        Self { join_timeout: Duration::from_secs(5) }
    }
}

/// Reconciles identity observations with profile reads into a single
/// observable [`SessionState`].
///
/// State machine: `Unresolved -> Resolving -> Resolved | Failed`. A
/// `Failed` state is only left by a new identity observation or an
/// explicit user action; there is no automatic retry.
pub struct SessionReconciler {
    gateway: Arc<dyn IdentityGateway>,
    profiles: Arc<dyn ProfileStore>,
    cache: Arc<dyn SessionCache>,
    config: SessionReconcilerConfig,
    state_tx: watch::Sender<SessionState>,
    cancellation: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl SessionReconciler {
    /// Create a new reconciler. The state starts `Unresolved` and stays
    /// there until [`start`](Self::start) observes the current identity.
    pub fn new(
        gateway: Arc<dyn IdentityGateway>,
        profiles: Arc<dyn ProfileStore>,
        cache: Arc<dyn SessionCache>,
    ) -> Self {
        Self::with_config(gateway, profiles, cache, SessionReconcilerConfig::default())
    }

    /// Create a new reconciler with an explicit configuration.
    pub fn with_config(
        gateway: Arc<dyn IdentityGateway>,
        profiles: Arc<dyn ProfileStore>,
        cache: Arc<dyn SessionCache>,
        config: SessionReconcilerConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Unresolved);
        Self {
            gateway,
            profiles,
            cache,
            config,
            state_tx,
            cancellation: CancellationToken::new(),
            task_handle: None,
        }
    }

    /// Subscribe to reconciled session state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Whether the background task is running.
    pub fn is_running(&self) -> bool {
        self.task_handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Start the reconciler, spawning the observation task.
    ///
    /// The current identity value is reconciled immediately, then every
    /// transition pushed by the gateway is reconciled in turn.
    ///
    /// # Errors
    /// Returns an error if the reconciler is already running.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> studyloop_domain::Result<()> {
        if self.is_running() {
            return Err(AuthError::Internal("session reconciler already running".into()));
        }

        info!("starting session reconciler");
        self.cancellation = CancellationToken::new();

        let gateway = Arc::clone(&self.gateway);
        let profiles = Arc::clone(&self.profiles);
        let cache = Arc::clone(&self.cache);
        let state_tx = self.state_tx.clone();
        let cancel = self.cancellation.clone();

        let handle = tokio::spawn(async move {
            Self::observe_loop(gateway, profiles, cache, state_tx, cancel).await;
        });
        self.task_handle = Some(handle);
        Ok(())
    }

    /// Stop the reconciler, cancelling the observation task and joining
    /// it. Idempotent; no listener survives teardown.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) {
        self.cancellation.cancel();

        if let Some(handle) = self.task_handle.take() {
            let abort = handle.abort_handle();
            match tokio::time::timeout(self.config.join_timeout, handle).await {
                Ok(Ok(())) => info!("session reconciler stopped"),
                Ok(Err(err)) => warn!(error = %err, "session reconciler task panicked"),
                Err(_) => {
                    warn!("session reconciler join timed out, aborting task");
                    abort.abort();
                }
            }
        }
    }

    async fn observe_loop(
        gateway: Arc<dyn IdentityGateway>,
        profiles: Arc<dyn ProfileStore>,
        cache: Arc<dyn SessionCache>,
        state_tx: watch::Sender<SessionState>,
        cancel: CancellationToken,
    ) {
        let mut identity_rx = gateway.observe();

        loop {
            let observed = identity_rx.borrow_and_update().clone();

            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("reconciliation cancelled before completion");
                    break;
                }
                () = Self::reconcile(&profiles, &cache, &state_tx, observed) => {}
            }

            tokio::select! {
                () = cancel.cancelled() => break,
                changed = identity_rx.changed() => {
                    if changed.is_err() {
                        // Gateway dropped its sender; nothing left to observe.
                        warn!("identity observation stream closed");
                        break;
                    }
                }
            }
        }
    }

    /// Reconcile one identity observation into a session state.
    ///
    /// Cancellation unwinds through the enclosing `select!` without
    /// emitting anything: a cancellation is not a failure.
    async fn reconcile(
        profiles: &Arc<dyn ProfileStore>,
        cache: &Arc<dyn SessionCache>,
        state_tx: &watch::Sender<SessionState>,
        observed: Option<Identity>,
    ) {
        let Some(identity) = observed else {
            debug!("identity absent, session resolved as signed out");
            if let Err(err) = cache.clear().await {
                warn!(error = %err, "failed to clear session cache");
            }
            state_tx.send_replace(SessionState::Resolved(Session::signed_out()));
            return;
        };

        state_tx.send_replace(SessionState::Resolving);

        match profiles.read_profile(&identity.uid).await {
            Ok(Some(profile)) => {
                debug!(uid = %identity.uid, role = %profile.role, "session resolved with profile");
                Self::write_cache(
                    cache,
                    CachedSession { role: profile.role, is_anonymous: identity.is_anonymous },
                )
                .await;
                state_tx.send_replace(SessionState::Resolved(Session::full(identity, profile)));
            }
            Ok(None) => {
                // Anonymous identities have no profile until upgrade; the
                // UI treats this as guest-like rather than erroring.
                debug!(uid = %identity.uid, "no profile document, session resolved as guest");
                Self::write_cache(
                    cache,
                    CachedSession { role: Role::Student, is_anonymous: true },
                )
                .await;
                state_tx.send_replace(SessionState::Resolved(Session::guest(identity)));
            }
            Err(AuthError::Cancelled) => {
                debug!(uid = %identity.uid, "profile read cancelled, no state emitted");
            }
            Err(err) => {
                warn!(uid = %identity.uid, error = %err, label = err.label(), "profile read failed");
                state_tx.send_replace(SessionState::Failed(err));
            }
        }
    }

    async fn write_cache(cache: &Arc<dyn SessionCache>, entry: CachedSession) {
        if let Err(err) = cache.store(entry).await {
            warn!(error = %err, "failed to update session cache");
        }
    }
}

impl std::fmt::Debug for SessionReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionReconciler")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
