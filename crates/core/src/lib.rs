//! # Studyloop Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the identity service, the
//!   profile document store, and the advisory session cache
//! - The user-invoked auth flows ([`AuthService`])
//! - The passive session reconciliation state machine
//!   ([`SessionReconciler`])
//!
//! ## Architecture Principles
//! - Only depends on `studyloop-domain`
//! - No HTTP, filesystem, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod auth;
pub mod session;

pub use auth::ports::{IdentityGateway, ProfileStore, SessionCache};
pub use auth::AuthService;
pub use session::SessionReconciler;
