//! Identity service adapter

pub mod client;

pub use client::{IdentityClient, IdentityClientConfig};
