//! Passive session reconciliation

pub mod reconciler;

pub use reconciler::{SessionReconciler, SessionReconcilerConfig};
