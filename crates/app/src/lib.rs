//! Studyloop application layer
//!
//! Wires the infrastructure adapters into the core services and exposes
//! the surface a UI shell binds to: the [`AppContext`] dependency
//! container and the [`AuthViewModel`] with its observable session and
//! UI state.

pub mod context;
pub mod logging;
pub mod messages;
pub mod viewmodel;

pub use context::AppContext;
pub use viewmodel::{AuthViewModel, Notice, UiState};
