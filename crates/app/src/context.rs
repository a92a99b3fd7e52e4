//! Application context - dependency injection container

use std::sync::Arc;

use studyloop_core::auth::ports::{IdentityGateway, ProfileStore, SessionCache};
use studyloop_core::{AuthService, SessionReconciler};
use studyloop_domain::{Config, Result, SessionState};
use studyloop_infra::{
    FileSessionCache, IdentityClient, IdentityClientConfig, ProfileStoreClient,
    ProfileStoreClientConfig,
};
use tokio::sync::watch;
use tracing::warn;

use crate::viewmodel::AuthViewModel;

/// Application context - holds the adapters, services and the running
/// session reconciler.
pub struct AppContext {
    pub config: Config,
    pub gateway: Arc<dyn IdentityGateway>,
    pub profiles: Arc<dyn ProfileStore>,
    pub cache: Arc<dyn SessionCache>,
    pub auth_service: Arc<AuthService>,
    reconciler: SessionReconciler,
}

impl AppContext {
    /// Build the context from the ambient configuration (environment
    /// variables first, config file fallback) and start the reconciler.
    ///
    /// # Errors
    /// Returns `AuthError::Config` when no usable configuration is found,
    /// or `Internal` when a component fails to construct.
    pub fn new() -> Result<Self> {
        Self::with_config(studyloop_infra::config::load()?)
    }

    /// Build the context from an explicit configuration and start the
    /// reconciler. Primarily for tests.
    ///
    /// # Errors
    /// Returns an error when a component fails to construct or the
    /// reconciler fails to start.
    pub fn with_config(config: Config) -> Result<Self> {
        let gateway: Arc<dyn IdentityGateway> =
            Arc::new(IdentityClient::new(IdentityClientConfig::from(&config.identity))?);
        let profiles: Arc<dyn ProfileStore> =
            Arc::new(ProfileStoreClient::new(ProfileStoreClientConfig::from(&config.profile_store))?);
        let cache: Arc<dyn SessionCache> = Arc::new(FileSessionCache::new(&config.cache.path));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&gateway),
            Arc::clone(&profiles),
            Arc::clone(&cache),
        ));

        let mut reconciler = SessionReconciler::new(
            Arc::clone(&gateway),
            Arc::clone(&profiles),
            Arc::clone(&cache),
        );
        reconciler.start()?;

        Ok(Self { config, gateway, profiles, cache, auth_service, reconciler })
    }

    /// Subscribe to the reconciled session state.
    #[must_use]
    pub fn session(&self) -> watch::Receiver<SessionState> {
        self.reconciler.subscribe()
    }

    /// Build a view model bound to this context.
    ///
    /// Loads the advisory cache entry once so the first render can make
    /// a role decision before the session resolves; a failed load seeds
    /// nothing and is logged only.
    pub async fn view_model(&self) -> AuthViewModel {
        let cached = match self.cache.load().await {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "failed to pre-load session cache");
                None
            }
        };

        AuthViewModel::new(Arc::clone(&self.auth_service), self.reconciler.subscribe(), cached)
    }

    /// Stop the reconciler and release its identity subscription.
    pub async fn shutdown(&mut self) {
        self.reconciler.stop().await;
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").field("config", &self.config).finish_non_exhaustive()
    }
}
