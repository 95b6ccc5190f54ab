//! Cart identifier resolution.
//!
//! Derives a stable cart identifier from the request's session: the account
//! name for signed-in users, a generated per-session token otherwise.
//! Everything flows through the explicit `Session` parameter; nothing here
//! is process-global.

use tower_sessions::Session;
use uuid::Uuid;

use crate::models::{CurrentUser, session_keys};

/// Resolve the cart identifier for this request.
///
/// - Signed-in: the user's email, the stable account name.
/// - Anonymous: a per-session UUID token, generated and stored in the
///   session on first call.
///
/// # Errors
///
/// Returns the session store's error if it is unavailable; that is fatal
/// for the request and surfaced to the caller.
pub async fn resolve_cart_id(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(user) = session.get::<CurrentUser>(session_keys::CURRENT_USER).await? {
        return Ok(user.email.to_string());
    }

    if let Some(cart_id) = session.get::<String>(session_keys::CART_ID).await? {
        return Ok(cart_id);
    }

    let cart_id = Uuid::new_v4().to_string();
    session.insert(session_keys::CART_ID, &cart_id).await?;
    Ok(cart_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::{MemoryStore, Session};

    use super::*;
    use spindle_core::{Email, UserId};

    fn test_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn anonymous_identifier_is_stable_within_a_session() {
        let session = test_session();

        let first = resolve_cart_id(&session).await.unwrap();
        let second = resolve_cart_id(&session).await.unwrap();

        assert_eq!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[tokio::test]
    async fn distinct_sessions_get_distinct_identifiers() {
        let a = resolve_cart_id(&test_session()).await.unwrap();
        let b = resolve_cart_id(&test_session()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn signed_in_user_resolves_to_account_name() {
        let session = test_session();
        let user = CurrentUser {
            id: UserId::new(1),
            email: Email::parse("fan@example.com").unwrap(),
        };
        session
            .insert(session_keys::CURRENT_USER, &user)
            .await
            .unwrap();

        let cart_id = resolve_cart_id(&session).await.unwrap();
        assert_eq!(cart_id, "fan@example.com");
    }
}
