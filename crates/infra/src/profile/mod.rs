//! Profile document store adapter

pub mod client;

pub use client::{ProfileStoreClient, ProfileStoreClientConfig};
