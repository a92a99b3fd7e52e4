//! REST adapter for the profile document store
//!
//! Profile records live at `users/{id}` with a flat camelCase layout.
//! Every wire field has a safe default so documents written by
//! forward/backward-incompatible schema versions still map cleanly; a body
//! that cannot be deserialized at all is classified `ProfileMalformed`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use studyloop_core::auth::ports::ProfileStore;
use studyloop_domain::constants::PROFILE_COLLECTION;
use studyloop_domain::{AuthError, Profile, ProfileStoreConfig, Result, Role};
use tracing::{debug, instrument};

use crate::http::HttpClient;

/// Configuration for the profile store client.
#[derive(Debug, Clone)]
pub struct ProfileStoreClientConfig {
    /// Base URL of the document store REST API, without trailing slash.
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub max_retries: usize,
}

impl From<&ProfileStoreConfig> for ProfileStoreClientConfig {
    fn from(config: &ProfileStoreConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
            max_retries: config.max_retries,
        }
    }
}

/// Document store REST client.
pub struct ProfileStoreClient {
    http: HttpClient,
    config: ProfileStoreClientConfig,
}

/// Wire representation of a profile record.
///
/// Defaults on every field keep partially-written and legacy documents
/// deserializable; the mapping to [`Profile`] is therefore total.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProfileDocument {
    id: String,
    email: String,
    name: String,
    role: Role,
    avatar_url: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl From<&Profile> for ProfileDocument {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            email: profile.email.clone(),
            name: profile.name.clone(),
            role: profile.role,
            avatar_url: profile.avatar_url.clone(),
            created_at: Some(profile.created_at),
        }
    }
}

impl From<ProfileDocument> for Profile {
    fn from(doc: ProfileDocument) -> Self {
        Self {
            id: doc.id,
            email: doc.email,
            name: doc.name,
            role: doc.role,
            avatar_url: doc.avatar_url,
            created_at: doc.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        }
    }
}

impl ProfileStoreClient {
    /// Create a new profile store client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ProfileStoreClientConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_retries)
            .build()?;
        Ok(Self { http, config })
    }

    fn document_url(&self, id: &str) -> String {
        format!(
            "{}/{}/{}?key={}",
            self.config.base_url, PROFILE_COLLECTION, id, self.config.api_key
        )
    }
}

#[async_trait]
impl ProfileStore for ProfileStoreClient {
    #[instrument(skip(self), fields(id = %id))]
    async fn read_profile(&self, id: &str) -> Result<Option<Profile>> {
        let builder = self.http.request(Method::GET, self.document_url(id));
        let response = self.http.send(builder).await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("profile document absent");
                Ok(None)
            }
            status if status.is_success() => {
                let body = response.text().await.map_err(|err| {
                    AuthError::Network(format!("failed to read profile body: {err}"))
                })?;
                let doc = serde_json::from_str::<ProfileDocument>(&body).map_err(|err| {
                    AuthError::ProfileMalformed(format!("document for {id} unusable: {err}"))
                })?;
                debug!(role = %doc.role, "profile document read");
                Ok(Some(doc.into()))
            }
            status => Err(AuthError::Network(format!("profile read failed ({status})"))),
        }
    }

    #[instrument(skip(self, profile), fields(id = %profile.id, merge))]
    async fn write_profile(&self, profile: &Profile, merge: bool) -> Result<()> {
        // merge=false replaces the whole record (creation); merge=true
        // merges fields (defensive re-saves on reconciliation).
        let method = if merge { Method::PATCH } else { Method::PUT };
        let doc = ProfileDocument::from(profile);

        let builder = self.http.request(method, self.document_url(&profile.id)).json(&doc);
        let response = self.http.send(builder).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Network(format!("profile write failed ({status})")));
        }
        debug!("profile document written");
        Ok(())
    }
}

impl std::fmt::Debug for ProfileStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStoreClient").field("base_url", &self.config.base_url).finish()
    }
}
