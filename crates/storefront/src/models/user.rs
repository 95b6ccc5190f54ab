//! User account record.

use chrono::{DateTime, Utc};
use spindle_core::{Email, UserId};

/// A registered user.
#[derive(Debug, Clone)]
pub struct User {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}
