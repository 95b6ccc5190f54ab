//! HTTP route handlers for the storefront.
//!
//! Route structure:
//! - `/` - album catalog
//! - `/ShoppingCart/` - cart page
//! - `/ShoppingCart/AddToCart/{id}` - add one copy of an album
//! - `/ShoppingCart/RemoveFromCart/{id}` - remove one copy of a line item
//! - `/auth/*` - sign in and sign out
//! - `/health`, `/health/ready` - liveness and readiness probes

pub mod auth;
pub mod cart;
pub mod home;

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::SqliteStore;

use crate::state::AppState;

/// Build the complete application router.
pub fn app(state: AppState, session_layer: SessionManagerLayer<SqliteStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// All storefront routes, without the ambient middleware stack.
fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(shopping_cart_routes())
        .nest("/auth", auth_routes())
}

fn shopping_cart_routes() -> Router<AppState> {
    // Registered with full paths: `nest` would not match the trailing
    // slash on `/ShoppingCart/`, which is the cart page's canonical URL.
    Router::new()
        .route("/ShoppingCart/", get(cart::index))
        .route("/ShoppingCart/AddToCart/{id}", get(cart::add_to_cart))
        .route(
            "/ShoppingCart/RemoveFromCart/{id}",
            post(cart::remove_from_cart),
        )
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Liveness probe.
async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: verifies the database is reachable.
async fn readiness(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl IntoResponse {
    match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(state.pool())
        .await
    {
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}
