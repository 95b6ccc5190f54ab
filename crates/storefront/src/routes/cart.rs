//! Shopping cart page and cart mutations.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use spindle_core::{AlbumId, CartItemId, Price};

use crate::error::AppError;
use crate::models::CartLine;
use crate::services::antiforgery;
use crate::services::cart::{CartService, RemovalResult};
use crate::services::identity::resolve_cart_id;
use crate::state::AppState;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/index.html")]
pub struct CartIndexTemplate {
    pub items: Vec<CartLineView>,
    pub total: String,
    pub token: String,
}

/// One cart line as rendered on the cart page.
pub struct CartLineView {
    pub id: i32,
    pub title: String,
    pub artist: String,
    pub quantity: i64,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.item_id.as_i32(),
            title: line.title.clone(),
            artist: line.artist.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price().display(),
            line_total: line.line_total().display(),
        }
    }
}

/// Form body for `RemoveFromCart`. The token field is optional so its
/// absence is our `Missing` error rather than a generic 422.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    #[serde(rename = "RequestVerificationToken")]
    pub request_verification_token: Option<String>,
}

/// JSON confirmation payload for a removal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveFromCartPayload {
    pub message: String,
    pub cart_total: Price,
    pub cart_count: i64,
    pub item_count: i64,
    pub delete_id: i32,
}

/// GET /ShoppingCart/ - render the cart with its anti-forgery token.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<CartIndexTemplate, AppError> {
    let cart_id = resolve_cart_id(&session).await?;
    let (lines, total) = CartService::new(state.pool()).cart_view(&cart_id).await?;
    let token = antiforgery::issue(&session).await?;

    Ok(CartIndexTemplate {
        items: lines.iter().map(CartLineView::from).collect(),
        total: total.display(),
        token,
    })
}

/// GET /ShoppingCart/AddToCart/{id} - add one copy and redirect to the cart.
///
/// Unknown albums are a 404; a successful add answers with a 302 to the
/// cart page.
#[instrument(skip(state, session))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let cart_id = resolve_cart_id(&session).await?;

    CartService::new(state.pool())
        .add_to_cart(&cart_id, AlbumId::new(id))
        .await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, "/ShoppingCart/")]))
}

/// POST /ShoppingCart/RemoveFromCart/{id} - remove one copy of a line item.
///
/// The anti-forgery token is validated before anything else touches the
/// store. Removing an item that is not in the cart is not an error; the
/// payload reports `ItemCount: 0` with unchanged totals.
#[instrument(skip(state, session, form))]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Json<RemoveFromCartPayload>, AppError> {
    antiforgery::validate(&session, form.request_verification_token.as_deref()).await?;

    let cart_id = resolve_cart_id(&session).await?;
    let result = CartService::new(state.pool())
        .remove_from_cart(&cart_id, CartItemId::new(id))
        .await?;

    Ok(Json(RemoveFromCartPayload {
        message: removal_message(&result),
        cart_total: result.new_total,
        cart_count: result.new_count,
        item_count: result.removed_count,
        delete_id: id,
    }))
}

/// Human-readable confirmation for the removal payload.
fn removal_message(result: &RemovalResult) -> String {
    match (&result.album_title, result.removed_count) {
        (Some(title), n) if n > 0 => {
            format!("1 copy of {title} has been removed from your shopping cart.")
        }
        _ => "The item has already been removed from your shopping cart.".to_string(),
    }
}
