//! # Studyloop Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP adapters for the managed identity service and the profile
//!   document store
//! - The file-backed advisory session cache
//! - Configuration loading (environment first, file fallback)
//!
//! ## Architecture
//! - Implements traits defined in `studyloop-core`
//! - Contains all "impure" code (network, filesystem)

pub mod cache;
pub mod config;
pub mod errors;
pub mod http;
pub mod identity;
pub mod profile;

// Re-export commonly used items
pub use cache::FileSessionCache;
pub use errors::InfraError;
pub use http::HttpClient;
pub use identity::{IdentityClient, IdentityClientConfig};
pub use profile::{ProfileStoreClient, ProfileStoreClientConfig};
