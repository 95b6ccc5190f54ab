//! User management commands.

use spindle_storefront::services::auth::AuthService;

use super::{CommandError, connect};

/// Register a new user.
///
/// # Errors
///
/// Returns `CommandError` if the email is invalid, the password is too
/// short, or the email is already registered.
pub async fn create(email: &str, password: &str) -> Result<(), CommandError> {
    let pool = connect().await?;

    let user = AuthService::new(&pool).register(email, password).await?;
    tracing::info!(%user.id, email = %user.email, "user created");

    Ok(())
}
