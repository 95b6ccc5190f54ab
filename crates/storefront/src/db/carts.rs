//! Cart repository: persistence-backed line items keyed by cart identifier.
//!
//! A cart is never stored as its own row; it is the set of `cart_item` rows
//! sharing a `cart_id`. Adds are upserts against the (`cart_id`, `album_id`)
//! uniqueness constraint, so concurrent adds for the same pair increment one
//! row instead of inserting duplicates.

use sqlx::SqlitePool;

use spindle_core::{AlbumId, CartItemId, Price};

use super::RepositoryError;
use crate::models::{CartItem, CartLine};

const ITEM_COLUMNS: &str = "id, cart_id, album_id, quantity, created_at";

const LINE_QUERY: &str = "SELECT ci.id AS item_id, ci.album_id, a.title, a.artist, \
     ci.quantity, a.price_cents \
     FROM cart_item ci JOIN album a ON a.id = ci.album_id";

/// Repository for cart line item operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add one copy of an album to a cart.
    ///
    /// Inserts a quantity-1 row on first add, otherwise increments the
    /// existing row. Returns the resulting row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails (including a
    /// foreign key violation for an unknown album; callers validate the
    /// album first to surface that as a not-found instead).
    pub async fn add_item(
        &self,
        cart_id: &str,
        album_id: AlbumId,
    ) -> Result<CartItem, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            "INSERT INTO cart_item (cart_id, album_id, quantity) VALUES (?1, ?2, 1) \
             ON CONFLICT (cart_id, album_id) DO UPDATE SET quantity = quantity + 1 \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(cart_id)
        .bind(album_id)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Remove one copy of a line item, deleting the row at quantity zero.
    ///
    /// The lookup is by the row's own ID, scoped to `cart_id` so one cart
    /// cannot remove another cart's items. Returns 1 if a unit was removed,
    /// 0 if the row does not exist — a missing item is a benign no-op, not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn remove_item(
        &self,
        cart_id: &str,
        item_id: CartItemId,
    ) -> Result<i64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let quantity: Option<i64> =
            sqlx::query_scalar("SELECT quantity FROM cart_item WHERE id = ?1 AND cart_id = ?2")
                .bind(item_id)
                .bind(cart_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(quantity) = quantity else {
            return Ok(0);
        };

        if quantity > 1 {
            sqlx::query("UPDATE cart_item SET quantity = quantity - 1 WHERE id = ?1")
                .bind(item_id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query("DELETE FROM cart_item WHERE id = ?1")
                .bind(item_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(1)
    }

    /// All line items for a cart, joined with album data, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for(&self, cart_id: &str) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(&format!(
            "{LINE_QUERY} WHERE ci.cart_id = ?1 ORDER BY ci.created_at, ci.id"
        ))
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// A single line item by its ID, scoped to the owning cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item(
        &self,
        cart_id: &str,
        item_id: CartItemId,
    ) -> Result<Option<CartLine>, RepositoryError> {
        let line = sqlx::query_as::<_, CartLine>(&format!(
            "{LINE_QUERY} WHERE ci.id = ?1 AND ci.cart_id = ?2"
        ))
        .bind(item_id)
        .bind(cart_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(line)
    }

    /// Σ(quantity × unit price) over the cart; zero for an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_for(&self, cart_id: &str) -> Result<Price, RepositoryError> {
        let cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(ci.quantity * a.price_cents), 0) \
             FROM cart_item ci JOIN album a ON a.id = ci.album_id \
             WHERE ci.cart_id = ?1",
        )
        .bind(cart_id)
        .fetch_one(self.pool)
        .await?;

        Ok(Price::from_cents(cents))
    }

    /// Σ(quantity) over the cart; zero for an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for(&self, cart_id: &str) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM cart_item WHERE cart_id = ?1",
        )
        .bind(cart_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Re-key every line item from one cart to another.
    ///
    /// Used at sign-in so an anonymous cart survives login. Lines whose
    /// album already exists in the target cart merge by summing quantities.
    /// Returns the number of source rows migrated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn migrate(
        &self,
        from_cart_id: &str,
        to_cart_id: &str,
    ) -> Result<i64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Fold overlapping albums into the target cart's rows.
        let merged = sqlx::query(
            "UPDATE cart_item SET quantity = quantity + \
                 (SELECT src.quantity FROM cart_item src \
                  WHERE src.cart_id = ?1 AND src.album_id = cart_item.album_id) \
             WHERE cart_id = ?2 AND album_id IN \
                 (SELECT album_id FROM cart_item WHERE cart_id = ?1)",
        )
        .bind(from_cart_id)
        .bind(to_cart_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query(
            "DELETE FROM cart_item WHERE cart_id = ?1 AND album_id IN \
                 (SELECT album_id FROM cart_item WHERE cart_id = ?2)",
        )
        .bind(from_cart_id)
        .bind(to_cart_id)
        .execute(&mut *tx)
        .await?;

        let rekeyed = sqlx::query("UPDATE cart_item SET cart_id = ?2 WHERE cart_id = ?1")
            .bind(from_cart_id)
            .bind(to_cart_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(i64::try_from(merged + rekeyed).unwrap_or(i64::MAX))
    }
}
