//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the Studyloop session core.
///
/// Every fault from the identity service or profile store is classified
/// into exactly one of these variants at the adapter boundary. Raw backend
/// error text stays inside the variant payload and is only ever shown to
/// the user through the generic fallback message.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AuthError {
    /// A required field was blank or malformed. Checked before any remote
    /// call is made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Email already in use")]
    EmailAlreadyInUse,

    #[error("Password too weak")]
    WeakPassword,

    /// Credential could not be linked to the anonymous identity.
    #[error("Credential mismatch")]
    CredentialMismatch,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Operation not allowed: {0}")]
    OperationNotAllowed(String),

    /// Authenticated identity has no profile document where one was
    /// expected (e.g. deleted out-of-band).
    #[error("Profile missing for user {0}")]
    ProfileMissing(String),

    /// Profile document exists but could not be deserialized.
    #[error("Profile malformed: {0}")]
    ProfileMalformed(String),

    /// In-flight operation was cancelled. Must never surface to the user.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable label for metrics and structured logging.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidCredentials => "invalid_credentials",
            Self::AccountNotFound => "account_not_found",
            Self::EmailAlreadyInUse => "email_in_use",
            Self::WeakPassword => "weak_password",
            Self::CredentialMismatch => "credential_mismatch",
            Self::Network(_) => "network",
            Self::OperationNotAllowed(_) => "operation_not_allowed",
            Self::ProfileMissing(_) => "profile_missing",
            Self::ProfileMalformed(_) => "profile_malformed",
            Self::Cancelled => "cancelled",
            Self::Config(_) => "config",
            Self::Cache(_) => "cache",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the fault is transient enough that a later identity
    /// observation (token refresh, re-login) may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Internal(_))
    }
}

/// Result type alias for Studyloop operations
pub type Result<T> = std::result::Result<T, AuthError>;
