//! REST adapter for the managed identity service
//!
//! Implements [`IdentityGateway`] over the identity service's account
//! endpoints (`accounts:signInWithPassword`, `accounts:signUp`,
//! `accounts:update`, `accounts:signOut`). The client owns the single
//! identity-observation channel the system maintains: every successful
//! mutation pushes the new authentication state, and sign-out always
//! pushes `None` locally even when the remote revocation fails.
//!
//! Backend error codes are classified into the domain taxonomy at this
//! boundary; raw backend text never crosses it except inside the
//! `Internal` fallback payload.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::{Deserialize, Serialize};
use studyloop_core::auth::ports::IdentityGateway;
use studyloop_domain::{AuthError, Identity, IdentityConfig, Result};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::http::HttpClient;

/// Configuration for the identity client.
#[derive(Debug, Clone)]
pub struct IdentityClientConfig {
    /// Base URL of the identity service REST API, without trailing slash.
    pub base_url: String,
    /// Project API key appended to every request.
    pub api_key: String,
    /// Timeout for API requests.
    pub timeout: Duration,
    /// Max attempts for transient failures.
    pub max_retries: usize,
}

impl From<&IdentityConfig> for IdentityClientConfig {
    fn from(config: &IdentityConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
            max_retries: config.max_retries,
        }
    }
}

/// Identity service REST client.
pub struct IdentityClient {
    http: HttpClient,
    config: IdentityClientConfig,
    identity_tx: watch::Sender<Option<Identity>>,
}

#[derive(Debug, Serialize)]
struct CredentialRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    local_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignOutRequest<'a> {
    local_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl IdentityClient {
    /// Create a new identity client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: IdentityClientConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_retries)
            .build()?;
        let (identity_tx, _) = watch::channel(None);
        Ok(Self { http, config, identity_tx })
    }

    fn endpoint(&self, operation: &str) -> String {
        format!("{}/accounts:{}?key={}", self.config.base_url, operation, self.config.api_key)
    }

    async fn post_account(&self, operation: &str, body: &impl Serialize) -> Result<AccountResponse> {
        let builder =
            self.http.request(Method::POST, self.endpoint(operation)).json(body);
        let response = self.http.send(builder).await?;
        Self::parse_account(response).await
    }

    async fn parse_account(response: Response) -> Result<AccountResponse> {
        let status = response.status();
        if status.is_success() {
            return response.json::<AccountResponse>().await.map_err(|err| {
                AuthError::Internal(format!("identity response decode failed: {err}"))
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_error_body(status.as_u16(), &body))
    }

    fn publish(&self, identity: Option<Identity>) {
        self.identity_tx.send_replace(identity);
    }
}

/// Map a backend error payload to the domain taxonomy.
///
/// Unmapped codes fall back to `Internal`; the UI layer shows those as the
/// generic "authentication failed" message.
fn classify_error_body(status: u16, body: &str) -> AuthError {
    let code = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_default();
    classify_error_code(status, &code)
}

fn classify_error_code(status: u16, code: &str) -> AuthError {
    // Codes may carry a trailing detail, e.g. "WEAK_PASSWORD : ...".
    let bare = code.split(':').next().unwrap_or_default().trim();
    match bare {
        "EMAIL_EXISTS" => AuthError::EmailAlreadyInUse,
        "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" | "USER_DISABLED" => AuthError::AccountNotFound,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AuthError::InvalidCredentials,
        "INVALID_EMAIL" => AuthError::InvalidInput("email is not valid".into()),
        "WEAK_PASSWORD" => AuthError::WeakPassword,
        "OPERATION_NOT_ALLOWED" | "ADMIN_ONLY_OPERATION" => {
            AuthError::OperationNotAllowed("operation disabled for this project".into())
        }
        "CREDENTIAL_MISMATCH" | "INVALID_IDP_RESPONSE" => AuthError::CredentialMismatch,
        _ if status >= 500 => AuthError::Network(format!("identity service error ({status})")),
        _ => AuthError::Internal(format!("unmapped identity error ({status}): {bare}")),
    }
}

#[async_trait]
impl IdentityGateway for IdentityClient {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let account = self
            .post_account("signInWithPassword", &CredentialRequest { email, password })
            .await?;
        let identity =
            Identity::new(account.local_id, account.email.unwrap_or_else(|| email.to_string()));
        info!(uid = %identity.uid, "signed in");
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        let account = self.post_account("signUp", &CredentialRequest { email, password }).await?;
        let identity =
            Identity::new(account.local_id, account.email.unwrap_or_else(|| email.to_string()));
        info!(uid = %identity.uid, "account created");
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    #[instrument(skip(self))]
    async fn sign_in_anonymous(&self) -> Result<Identity> {
        // An empty signUp body creates an anonymous principal.
        let account = self.post_account("signUp", &serde_json::json!({})).await?;
        let identity = Identity::anonymous(account.local_id);
        info!(uid = %identity.uid, "anonymous session created");
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn link_credential(&self, email: &str, password: &str) -> Result<Identity> {
        let current = self.current_identity().ok_or_else(|| {
            AuthError::OperationNotAllowed("no active session to link a credential to".into())
        })?;

        let account = self
            .post_account(
                "update",
                &UpdateRequest {
                    local_id: &current.uid,
                    display_name: None,
                    email: Some(email),
                    password: Some(password),
                },
            )
            .await?;

        // The whole point of linking: the handle survives the upgrade.
        let identity =
            Identity::new(account.local_id, account.email.unwrap_or_else(|| email.to_string()));
        info!(uid = %identity.uid, "credential linked to anonymous identity");
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn set_display_name(&self, name: &str) -> Result<()> {
        let current = self.current_identity().ok_or_else(|| {
            AuthError::OperationNotAllowed("no active session to update".into())
        })?;

        self.post_account(
            "update",
            &UpdateRequest {
                local_id: &current.uid,
                display_name: Some(name),
                email: None,
                password: None,
            },
        )
        .await?;
        debug!(uid = %current.uid, "display name updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<()> {
        let previous = self.current_identity();

        // The local session clears before the remote call so the contract
        // holds even when the revocation fails or never completes.
        self.publish(None);

        if let Some(identity) = previous {
            let builder = self
                .http
                .request(Method::POST, self.endpoint("signOut"))
                .json(&SignOutRequest { local_id: &identity.uid });
            match self.http.send(builder).await {
                Ok(response) if response.status().is_success() => {
                    info!(uid = %identity.uid, "remote session revoked");
                }
                Ok(response) => {
                    warn!(uid = %identity.uid, status = %response.status(), "remote sign-out rejected");
                }
                Err(err) => {
                    warn!(uid = %identity.uid, error = %err, "remote sign-out failed");
                }
            }
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

impl std::fmt::Debug for IdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityClient").field("base_url", &self.config.base_url).finish()
    }
}
