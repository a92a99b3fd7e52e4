//! In-memory fakes for the auth ports
//!
//! Substitute both external services so tests can drive each step of the
//! reconciliation state machine and the user-invoked flows
//! deterministically, without network dependencies.

// Not every test binary exercises every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use studyloop_core::auth::ports::{IdentityGateway, ProfileStore, SessionCache};
use studyloop_domain::{AuthError, CachedSession, Identity, Profile, Result};
use tokio::sync::watch;

/// In-memory identity service fake.
///
/// Accounts are keyed by email; the observation channel behaves like the
/// real gateway's: every successful mutation pushes the new identity
/// state, and sign-out always pushes `None` locally.
pub struct FakeIdentityGateway {
    identity_tx: watch::Sender<Option<Identity>>,
    accounts: Mutex<HashMap<String, StoredAccount>>,
    display_name: Mutex<Option<String>>,
    next_uid: Mutex<Vec<String>>,
    anonymous_allowed: bool,
    link_returns_fresh_uid: bool,
    remote_sign_out_fails: bool,
    remote_sign_out_failures: AtomicUsize,
    uid_counter: AtomicUsize,
}

struct StoredAccount {
    password: String,
    uid: String,
}

impl Default for FakeIdentityGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeIdentityGateway {
    pub fn new() -> Self {
        let (identity_tx, _) = watch::channel(None);
        Self {
            identity_tx,
            accounts: Mutex::new(HashMap::new()),
            display_name: Mutex::new(None),
            next_uid: Mutex::new(Vec::new()),
            anonymous_allowed: true,
            link_returns_fresh_uid: false,
            remote_sign_out_fails: false,
            remote_sign_out_failures: AtomicUsize::new(0),
            uid_counter: AtomicUsize::new(0),
        }
    }

    /// Disable anonymous sign-in, as a project admin could server-side.
    pub fn without_anonymous(mut self) -> Self {
        self.anonymous_allowed = false;
        self
    }

    /// Make credential linking hand back a fresh handle instead of
    /// preserving the current one, as a misbehaving backend could.
    pub fn with_link_returning_fresh_uid(mut self) -> Self {
        self.link_returns_fresh_uid = true;
        self
    }

    /// Make the remote half of sign-out fail; the local session must
    /// still clear.
    pub fn with_failing_remote_sign_out(mut self) -> Self {
        self.remote_sign_out_fails = true;
        self
    }

    /// Force the uid issued by the next account-creating call.
    pub fn queue_uid(&self, uid: &str) {
        self.next_uid.lock().unwrap().push(uid.to_string());
    }

    /// Pre-register an account without signing it in.
    pub fn seed_account(&self, email: &str, password: &str, uid: &str) {
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            StoredAccount { password: password.to_string(), uid: uid.to_string() },
        );
    }

    /// Simulate an out-of-band identity transition (e.g. token refresh).
    pub fn push_identity(&self, identity: Option<Identity>) {
        self.identity_tx.send_replace(identity);
    }

    pub fn display_name(&self) -> Option<String> {
        self.display_name.lock().unwrap().clone()
    }

    pub fn remote_sign_out_failures(&self) -> usize {
        self.remote_sign_out_failures.load(Ordering::SeqCst)
    }

    fn issue_uid(&self) -> String {
        if let Some(uid) = self.next_uid.lock().unwrap().pop() {
            return uid;
        }
        let n = self.uid_counter.fetch_add(1, Ordering::SeqCst);
        format!("uid-{n}")
    }
}

#[async_trait]
impl IdentityGateway for FakeIdentityGateway {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let identity = {
            let accounts = self.accounts.lock().unwrap();
            let account = accounts.get(email).ok_or(AuthError::AccountNotFound)?;
            if account.password != password {
                return Err(AuthError::InvalidCredentials);
            }
            Identity::new(account.uid.clone(), email.to_string())
        };
        self.identity_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        let identity = {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(AuthError::EmailAlreadyInUse);
            }
            let uid = self.issue_uid();
            accounts.insert(
                email.to_string(),
                StoredAccount { password: password.to_string(), uid: uid.clone() },
            );
            Identity::new(uid, email.to_string())
        };
        self.identity_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_anonymous(&self) -> Result<Identity> {
        if !self.anonymous_allowed {
            return Err(AuthError::OperationNotAllowed("anonymous sign-in disabled".into()));
        }
        let identity = Identity::anonymous(self.issue_uid());
        self.identity_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn link_credential(&self, email: &str, password: &str) -> Result<Identity> {
        let current = self
            .current_identity()
            .ok_or_else(|| AuthError::OperationNotAllowed("no active session".into()))?;
        let uid = if self.link_returns_fresh_uid { self.issue_uid() } else { current.uid };
        let identity = {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(AuthError::EmailAlreadyInUse);
            }
            accounts.insert(
                email.to_string(),
                StoredAccount { password: password.to_string(), uid: uid.clone() },
            );
            // Handle preserved across the upgrade unless configured otherwise.
            Identity::new(uid, email.to_string())
        };
        self.identity_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn set_display_name(&self, name: &str) -> Result<()> {
        *self.display_name.lock().unwrap() = Some(name.to_string());
        Ok(())
    }

    async fn sign_out(&self) -> Result<()> {
        // Local session clears regardless of the remote outcome.
        self.identity_tx.send_replace(None);
        if self.remote_sign_out_fails {
            self.remote_sign_out_failures.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn observe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity_tx.subscribe()
    }

    fn current_identity(&self) -> Option<Identity> {
        self.identity_tx.borrow().clone()
    }
}

/// In-memory profile document store fake.
#[derive(Default)]
pub struct FakeProfileStore {
    docs: Mutex<HashMap<String, Profile>>,
    writes: Mutex<Vec<(Profile, bool)>>,
    read_error: Mutex<Option<AuthError>>,
    read_delay: Mutex<Option<std::time::Duration>>,
    fail_writes: Mutex<Option<AuthError>>,
    drop_writes: Mutex<bool>,
}

impl FakeProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document as if it had been written out-of-band.
    pub fn seed_profile(&self, profile: Profile) {
        self.docs.lock().unwrap().insert(profile.id.clone(), profile);
    }

    /// Remove a document out-of-band (e.g. deleted by an admin).
    pub fn delete_profile(&self, id: &str) {
        self.docs.lock().unwrap().remove(id);
    }

    /// Fail every read until cleared.
    pub fn set_read_error(&self, err: Option<AuthError>) {
        *self.read_error.lock().unwrap() = err;
    }

    /// Delay every read, so tests can interleave other events with an
    /// in-flight resolution.
    pub fn set_read_delay(&self, delay: std::time::Duration) {
        *self.read_delay.lock().unwrap() = Some(delay);
    }

    /// Fail every write until cleared.
    pub fn set_write_error(&self, err: Option<AuthError>) {
        *self.fail_writes.lock().unwrap() = err;
    }

    /// Acknowledge writes without storing the document, simulating a
    /// store that accepted the write but never surfaces it on read.
    pub fn drop_writes(&self) {
        *self.drop_writes.lock().unwrap() = true;
    }

    /// All writes observed, with their merge flags.
    pub fn writes(&self) -> Vec<(Profile, bool)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

#[async_trait]
impl ProfileStore for FakeProfileStore {
    async fn read_profile(&self, id: &str) -> Result<Option<Profile>> {
        let delay = *self.read_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.read_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.docs.lock().unwrap().get(id).cloned())
    }

    async fn write_profile(&self, profile: &Profile, merge: bool) -> Result<()> {
        if let Some(err) = self.fail_writes.lock().unwrap().clone() {
            return Err(err);
        }
        self.writes.lock().unwrap().push((profile.clone(), merge));
        if !*self.drop_writes.lock().unwrap() {
            self.docs.lock().unwrap().insert(profile.id.clone(), profile.clone());
        }
        Ok(())
    }
}

/// In-memory session cache fake.
#[derive(Default)]
pub struct FakeSessionCache {
    entry: Mutex<Option<CachedSession>>,
    store_count: AtomicUsize,
    clear_count: AtomicUsize,
}

impl FakeSessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self) -> Option<CachedSession> {
        *self.entry.lock().unwrap()
    }

    pub fn store_count(&self) -> usize {
        self.store_count.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clear_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionCache for FakeSessionCache {
    async fn load(&self) -> Result<Option<CachedSession>> {
        Ok(*self.entry.lock().unwrap())
    }

    async fn store(&self, entry: CachedSession) -> Result<()> {
        self.store_count.fetch_add(1, Ordering::SeqCst);
        *self.entry.lock().unwrap() = Some(entry);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.clear_count.fetch_add(1, Ordering::SeqCst);
        *self.entry.lock().unwrap() = None;
        Ok(())
    }
}
