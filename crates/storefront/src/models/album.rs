//! Album catalog record.

use chrono::{DateTime, Utc};
use spindle_core::{AlbumId, Price};

/// A catalog album. Read-only from the cart's perspective.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Album {
    /// Album's database ID.
    pub id: AlbumId,
    /// Album title.
    pub title: String,
    /// Performing artist.
    pub artist: String,
    /// Unit price in cents.
    pub price_cents: i64,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

impl Album {
    /// The album's unit price.
    #[must_use]
    pub fn price(&self) -> Price {
        Price::from_cents(self.price_cents)
    }
}
