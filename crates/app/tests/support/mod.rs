//! Scriptable stubs for view-model tests.
//!
//! Each stub returns a pre-programmed result per port method; the
//! behavioural fakes live with the core service tests, these only need
//! to steer one flow at a time.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use studyloop_core::auth::ports::{IdentityGateway, ProfileStore, SessionCache};
use studyloop_domain::{AuthError, CachedSession, Identity, Profile, Result};
use tokio::sync::{oneshot, watch};

pub struct StubGateway {
    identity_tx: watch::Sender<Option<Identity>>,
    result: Mutex<Result<Identity>>,
    hold: Mutex<Option<oneshot::Receiver<()>>>,
}

impl StubGateway {
    pub fn signing_in_as(identity: Identity) -> Arc<Self> {
        Arc::new(Self {
            identity_tx: watch::Sender::new(None),
            result: Mutex::new(Ok(identity)),
            hold: Mutex::new(None),
        })
    }

    pub fn failing_with(error: AuthError) -> Arc<Self> {
        Arc::new(Self {
            identity_tx: watch::Sender::new(None),
            result: Mutex::new(Err(error)),
            hold: Mutex::new(None),
        })
    }

    /// Make the next credential call park until the returned sender
    /// fires, so tests can observe in-flight UI state.
    pub fn hold_next_call(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.hold.lock().unwrap() = Some(rx);
        tx
    }

    async fn scripted(&self) -> Result<Identity> {
        let gate = self.hold.lock().unwrap().take();
        if let Some(rx) = gate {
            let _ = rx.await;
        }

        let result = self.result.lock().unwrap().clone();
        if let Ok(identity) = &result {
            self.identity_tx.send_replace(Some(identity.clone()));
        }
        result
    }
}

#[async_trait]
impl IdentityGateway for StubGateway {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Identity> {
        self.scripted().await
    }

    async fn sign_up(&self, _email: &str, _password: &str) -> Result<Identity> {
        self.scripted().await
    }

    async fn sign_in_anonymous(&self) -> Result<Identity> {
        self.scripted().await
    }

    async fn link_credential(&self, _email: &str, _password: &str) -> Result<Identity> {
        self.scripted().await
    }

    async fn set_display_name(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    async fn sign_out(&self) -> Result<()> {
        self.identity_tx.send_replace(None);
        Ok(())
    }

    fn observe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity_tx.subscribe()
    }

    fn current_identity(&self) -> Option<Identity> {
        self.identity_tx.borrow().clone()
    }
}

pub struct StubProfileStore {
    result: Mutex<Result<Option<Profile>>>,
}

impl StubProfileStore {
    pub fn returning(profile: Profile) -> Arc<Self> {
        Arc::new(Self { result: Mutex::new(Ok(Some(profile))) })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self { result: Mutex::new(Ok(None)) })
    }

    pub fn failing_with(error: AuthError) -> Arc<Self> {
        Arc::new(Self { result: Mutex::new(Err(error)) })
    }
}

#[async_trait]
impl ProfileStore for StubProfileStore {
    async fn read_profile(&self, _id: &str) -> Result<Option<Profile>> {
        self.result.lock().unwrap().clone()
    }

    async fn write_profile(&self, _profile: &Profile, _merge: bool) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct StubCache {
    entry: Mutex<Option<CachedSession>>,
}

impl StubCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl SessionCache for StubCache {
    async fn load(&self) -> Result<Option<CachedSession>> {
        Ok(*self.entry.lock().unwrap())
    }

    async fn store(&self, entry: CachedSession) -> Result<()> {
        *self.entry.lock().unwrap() = Some(entry);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.entry.lock().unwrap() = None;
        Ok(())
    }
}
