//! Cart line item records.

use chrono::{DateTime, Utc};
use spindle_core::{AlbumId, CartItemId, Price};

/// A stored cart row: one album within one cart.
///
/// Unique per (`cart_id`, `album_id`); quantity is always >= 1 in storage,
/// a decrement to zero deletes the row instead.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartItem {
    /// Row ID, used as the removal handle.
    pub id: CartItemId,
    /// Owning cart identifier (session token or account name).
    pub cart_id: String,
    /// The album in this line.
    pub album_id: AlbumId,
    /// Number of copies.
    pub quantity: i64,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

/// A cart row joined with its album, as listed on the cart page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    /// Cart item row ID.
    pub item_id: CartItemId,
    /// The album in this line.
    pub album_id: AlbumId,
    /// Album title.
    pub title: String,
    /// Performing artist.
    pub artist: String,
    /// Number of copies.
    pub quantity: i64,
    /// Unit price in cents.
    pub price_cents: i64,
}

impl CartLine {
    /// The unit price of the album.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::from_cents(self.price_cents)
    }

    /// quantity × unit price.
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::from_cents(self.quantity * self.price_cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_multiplies_quantity_by_unit_price() {
        let line = CartLine {
            item_id: CartItemId::new(1),
            album_id: AlbumId::new(2),
            title: "Kind of Blue".to_string(),
            artist: "Miles Davis".to_string(),
            quantity: 3,
            price_cents: 1299,
        };
        assert_eq!(line.unit_price().display(), "$12.99");
        assert_eq!(line.line_total().display(), "$38.97");
    }
}
