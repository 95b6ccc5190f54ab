//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use spindle_core::{Email, UserId};

use super::RepositoryError;
use crate::models::User;

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

type UserRow = (i32, String, DateTime<Utc>);

fn row_to_user((id, email, created_at): UserRow) -> Result<User, RepositoryError> {
    let email = Email::parse(&email)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))?;

    Ok(User {
        id: UserId::new(id),
        email,
        created_at,
    })
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with email and password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO user (email, password_hash) VALUES (?1, ?2) \
             RETURNING id, email, created_at",
        )
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row_to_user(row)
    }

    /// Get a user and their password hash by email.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, (i32, String, DateTime<Utc>, String)>(
            "SELECT id, email, created_at, password_hash FROM user WHERE email = ?1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some((id, email, created_at, password_hash)) = row else {
            return Ok(None);
        };

        let user = row_to_user((id, email, created_at))?;
        Ok(Some((user, password_hash)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn create_and_fetch_round_trip() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);
        let email = Email::parse("fan@example.com").unwrap();

        let user = repo.create(&email, "hash").await.unwrap();
        assert_eq!(user.email, email);

        let (fetched, hash) = repo.get_password_hash(&email).await.unwrap().unwrap();
        assert_eq!(fetched.id, user.id);
        assert_eq!(hash, "hash");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);
        let email = Email::parse("fan@example.com").unwrap();

        repo.create(&email, "hash").await.unwrap();
        let err = repo.create(&email, "hash").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn unknown_email_returns_none() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);
        let email = Email::parse("nobody@example.com").unwrap();

        assert!(repo.get_password_hash(&email).await.unwrap().is_none());
    }
}
