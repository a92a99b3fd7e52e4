//! Domain data types

pub mod session;
pub mod user;

pub use session::{Identity, Session, SessionState};
pub use user::{CachedSession, GuestSession, Profile, Role};
