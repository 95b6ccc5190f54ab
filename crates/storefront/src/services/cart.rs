//! Cart service: business operations over the cart and album repositories.

use sqlx::SqlitePool;
use thiserror::Error;

use spindle_core::{AlbumId, CartItemId, Price};

use crate::db::RepositoryError;
use crate::db::albums::AlbumRepository;
use crate::db::carts::CartRepository;
use crate::models::{CartItem, CartLine};

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The album to add does not exist. Surfaced as HTTP 404.
    #[error("album {0} not found")]
    AlbumNotFound(AlbumId),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Outcome of a removal, rendered by the boundary layer as a confirmation
/// payload.
#[derive(Debug)]
pub struct RemovalResult {
    /// 1 if a unit was removed, 0 if the item did not exist.
    pub removed_count: i64,
    /// Cart total after the removal.
    pub new_total: Price,
    /// Cart item count after the removal.
    pub new_count: i64,
    /// Title of the removed album, read before the removal so an item
    /// deleted to zero can still be named. `None` if the item never existed.
    pub album_title: Option<String>,
}

/// Cart business operations.
///
/// Note the asymmetry: adding an unknown album is a client error, removing
/// an unknown item is a silent no-op.
pub struct CartService<'a> {
    albums: AlbumRepository<'a>,
    carts: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            albums: AlbumRepository::new(pool),
            carts: CartRepository::new(pool),
        }
    }

    /// Add one copy of an album to the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::AlbumNotFound` if the album does not exist, or
    /// `CartError::Repository` if persistence fails.
    pub async fn add_to_cart(
        &self,
        cart_id: &str,
        album_id: AlbumId,
    ) -> Result<CartItem, CartError> {
        let album = self
            .albums
            .get(album_id)
            .await?
            .ok_or(CartError::AlbumNotFound(album_id))?;

        let item = self.carts.add_item(cart_id, album.id).await?;

        tracing::debug!(cart_id, %album_id, quantity = item.quantity, "added album to cart");

        Ok(item)
    }

    /// Remove one copy of a line item and report the cart's new state.
    ///
    /// A missing item yields `removed_count = 0` with unchanged totals; it
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if persistence fails.
    pub async fn remove_from_cart(
        &self,
        cart_id: &str,
        item_id: CartItemId,
    ) -> Result<RemovalResult, CartError> {
        // Title first: once the row is deleted there is nothing left to name.
        let album_title = self
            .carts
            .item(cart_id, item_id)
            .await?
            .map(|line| line.title);

        let removed_count = self.carts.remove_item(cart_id, item_id).await?;

        let new_total = self.carts.total_for(cart_id).await?;
        let new_count = self.carts.count_for(cart_id).await?;

        Ok(RemovalResult {
            removed_count,
            new_total,
            new_count,
            album_title,
        })
    }

    /// Re-key an anonymous cart into a user's cart at sign-in.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if persistence fails.
    pub async fn migrate_cart(
        &self,
        anonymous_id: &str,
        user_id: &str,
    ) -> Result<i64, CartError> {
        let migrated = self.carts.migrate(anonymous_id, user_id).await?;
        if migrated > 0 {
            tracing::info!(migrated, "migrated anonymous cart at sign-in");
        }
        Ok(migrated)
    }

    /// Line items and total for the cart page.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if persistence fails.
    pub async fn cart_view(&self, cart_id: &str) -> Result<(Vec<CartLine>, Price), CartError> {
        let items = self.carts.items_for(cart_id).await?;
        let total = self.carts.total_for(cart_id).await?;
        Ok((items, total))
    }
}
