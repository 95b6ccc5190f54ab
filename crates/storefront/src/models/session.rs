//! Session-related types.
//!
//! Types and keys stored in the session: the signed-in user, the anonymous
//! cart token, and the anti-forgery token.

use serde::{Deserialize, Serialize};

use spindle_core::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user. The
/// email doubles as the user's cart identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the anonymous cart identifier token.
    pub const CART_ID: &str = "cart_id";

    /// Key for the anti-forgery token.
    pub const ANTI_FORGERY_TOKEN: &str = "anti_forgery_token";
}
