//! Anti-forgery token service.
//!
//! State-changing cart requests carry a two-part token formatted as
//! `"<cookiePart>:<formPart>"`. Both halves are issued from one per-session
//! secret (double submit); validation happens before any store mutation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use thiserror::Error;
use tower_sessions::Session;

use crate::models::session_keys;

const TOKEN_BYTES: usize = 32;

/// Anti-forgery validation failures. All reject the request with HTTP 400.
#[derive(Debug, Error)]
pub enum AntiForgeryError {
    /// No token was submitted.
    #[error("missing anti-forgery token")]
    Missing,

    /// The token does not split into exactly two ':'-separated parts.
    #[error("malformed anti-forgery token")]
    Malformed,

    /// A token part does not match the session's token.
    #[error("anti-forgery token mismatch")]
    Mismatch,

    /// Session store failure.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Return this session's anti-forgery token, generating and storing one on
/// first use.
///
/// # Errors
///
/// Returns `AntiForgeryError::Session` if the session store is unavailable.
pub async fn issue(session: &Session) -> Result<String, AntiForgeryError> {
    if let Some(token) = session
        .get::<String>(session_keys::ANTI_FORGERY_TOKEN)
        .await?
    {
        return Ok(token);
    }

    let mut bytes = [0_u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    let token = URL_SAFE_NO_PAD.encode(bytes);

    session
        .insert(session_keys::ANTI_FORGERY_TOKEN, &token)
        .await?;

    Ok(token)
}

/// Split a raw submitted token into its cookie and form halves.
///
/// # Errors
///
/// Returns `AntiForgeryError::Malformed` unless the input is exactly two
/// non-empty ':'-separated parts.
pub fn split_token_pair(raw: &str) -> Result<(&str, &str), AntiForgeryError> {
    let mut parts = raw.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(cookie), Some(form), None) if !cookie.is_empty() && !form.is_empty() => {
            Ok((cookie, form))
        }
        _ => Err(AntiForgeryError::Malformed),
    }
}

/// Validate a submitted token against the session.
///
/// Must be called before any store mutation in the handler.
///
/// # Errors
///
/// Returns `Missing` when no token was submitted, `Malformed` when it does
/// not split into exactly two parts, and `Mismatch` when either half does
/// not equal the session's token (or the session has none).
pub async fn validate(session: &Session, raw: Option<&str>) -> Result<(), AntiForgeryError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AntiForgeryError::Missing)?;

    let (cookie_part, form_part) = split_token_pair(raw)?;

    let expected = session
        .get::<String>(session_keys::ANTI_FORGERY_TOKEN)
        .await?
        .ok_or(AntiForgeryError::Mismatch)?;

    if cookie_part != expected || form_part != expected {
        return Err(AntiForgeryError::Mismatch);
    }

    Ok(())
}
