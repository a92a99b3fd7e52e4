//! Domain constants

/// Display name used for guests that did not supply one.
pub const GUEST_DISPLAY_NAME: &str = "Guest";

/// Document collection holding profile records (`users/{id}`).
pub const PROFILE_COLLECTION: &str = "users";

/// Minimum password length accepted before a sign-up or upgrade call is
/// attempted. The backend applies its own policy on top.
pub const MIN_PASSWORD_LEN: usize = 8;
