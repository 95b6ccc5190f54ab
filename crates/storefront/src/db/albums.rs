//! Album repository for catalog reads.

use sqlx::SqlitePool;

use spindle_core::AlbumId;

use super::RepositoryError;
use crate::models::Album;

const ALBUM_COLUMNS: &str = "id, title, artist, price_cents, created_at";

/// Repository for album database operations.
pub struct AlbumRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AlbumRepository<'a> {
    /// Create a new album repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an album by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: AlbumId) -> Result<Option<Album>, RepositoryError> {
        let album = sqlx::query_as::<_, Album>(&format!(
            "SELECT {ALBUM_COLUMNS} FROM album WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(album)
    }

    /// List the whole catalog, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Album>, RepositoryError> {
        let albums = sqlx::query_as::<_, Album>(&format!(
            "SELECT {ALBUM_COLUMNS} FROM album ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(albums)
    }

    /// Insert a new album. Used by seeding and tests.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        title: &str,
        artist: &str,
        price_cents: i64,
    ) -> Result<Album, RepositoryError> {
        let album = sqlx::query_as::<_, Album>(&format!(
            "INSERT INTO album (title, artist, price_cents) VALUES (?1, ?2, ?3) \
             RETURNING {ALBUM_COLUMNS}"
        ))
        .bind(title)
        .bind(artist)
        .bind(price_cents)
        .fetch_one(self.pool)
        .await?;

        Ok(album)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn get_returns_inserted_album() {
        let pool = test_pool().await;
        let repo = AlbumRepository::new(&pool);

        let inserted = repo.insert("Blue Train", "John Coltrane", 1499).await.unwrap();
        let fetched = repo.get(inserted.id).await.unwrap().unwrap();

        assert_eq!(fetched.title, "Blue Train");
        assert_eq!(fetched.artist, "John Coltrane");
        assert_eq!(fetched.price_cents, 1499);
        assert_eq!(fetched.price().display(), "$14.99");
    }

    #[tokio::test]
    async fn get_unknown_id_returns_none() {
        let pool = test_pool().await;
        let repo = AlbumRepository::new(&pool);

        assert!(repo.get(AlbumId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_returns_all_albums() {
        let pool = test_pool().await;
        let repo = AlbumRepository::new(&pool);

        repo.insert("A Love Supreme", "John Coltrane", 1299).await.unwrap();
        repo.insert("Giant Steps", "John Coltrane", 1199).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);
    }
}
