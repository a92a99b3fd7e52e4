//! User-invoked authentication flows and their port interfaces

pub mod ports;
pub mod service;
pub mod validation;

pub use service::AuthService;
