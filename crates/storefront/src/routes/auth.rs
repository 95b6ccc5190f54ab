//! Sign-in and sign-out handlers.
//!
//! Signing in migrates the session's anonymous cart into the user's cart
//! before the user identity is stored, so nothing in the cart is lost.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};
use crate::services::auth::{AuthError, AuthService};
use crate::services::cart::CartService;
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// GET /auth/login - render the login form.
pub async fn login_page() -> LoginTemplate {
    LoginTemplate { error: None }
}

/// POST /auth/login - authenticate and establish the session.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.pool());

    let user = match auth.login(&form.email, &form.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            return Ok(LoginTemplate {
                error: Some("Invalid email or password.".to_string()),
            }
            .into_response());
        }
        Err(err) => return Err(err.into()),
    };

    // Re-key the anonymous cart to the account name before the identity
    // switch makes the session resolve to it.
    if let Some(anonymous_id) = session.get::<String>(session_keys::CART_ID).await? {
        CartService::new(state.pool())
            .migrate_cart(&anonymous_id, user.email.as_str())
            .await?;
        session.remove::<String>(session_keys::CART_ID).await?;
    }

    session.cycle_id().await?;
    session
        .insert(
            session_keys::CURRENT_USER,
            &CurrentUser {
                id: user.id,
                email: user.email,
            },
        )
        .await?;

    Ok(Redirect::to("/").into_response())
}

/// POST /auth/logout - drop the user identity, keep the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(Redirect::to("/"))
}
