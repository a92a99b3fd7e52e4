//! Conversions from external infrastructure errors into domain errors.

use studyloop_domain::AuthError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AuthError);

impl From<InfraError> for AuthError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AuthError> for InfraError {
    fn from(value: AuthError) -> Self {
        Self(value)
    }
}

impl From<reqwest::Error> for InfraError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            return Self(AuthError::Network("http request timed out".into()));
        }
        if value.is_connect() {
            return Self(AuthError::Network(format!("connection failed: {value}")));
        }
        if value.is_decode() {
            return Self(AuthError::ProfileMalformed(format!("response decode failed: {value}")));
        }
        Self(AuthError::Network(format!("http error: {value}")))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(AuthError::Internal(format!("json serialization failed: {value}")))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(AuthError::Cache(format!("io error: {value}")))
    }
}
