//! Shopping cart flow tests: browsing, adding, and removing through the
//! full HTTP surface.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use spindle_integration_tests::{TestApp, encode_token_form, extract_removal_token};

async fn cart_item_id(app: &TestApp) -> i32 {
    sqlx::query_scalar::<_, i32>("SELECT id FROM cart_item LIMIT 1")
        .fetch_one(app.pool())
        .await
        .unwrap()
}

async fn cart_item_quantity(app: &TestApp) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(quantity), 0) FROM cart_item")
        .fetch_one(app.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn catalog_lists_seeded_albums() {
    let mut app = TestApp::spawn().await;
    app.seed_album("Aja", "Steely Dan", 1099).await;

    let response = app.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Aja"));
    assert!(response.body.contains("Steely Dan"));
    assert!(response.body.contains("$10.99"));
}

#[tokio::test]
async fn cart_page_starts_empty() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/ShoppingCart/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Your cart is empty"));
}

#[tokio::test]
async fn adding_an_unknown_album_is_not_found() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/ShoppingCart/AddToCart/999").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn adding_an_album_redirects_to_the_cart() {
    let mut app = TestApp::spawn().await;
    let album_id = app.seed_album("Aja", "Steely Dan", 1099).await;

    let response = app.get(&format!("/ShoppingCart/AddToCart/{album_id}")).await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location.as_deref(), Some("/ShoppingCart/"));

    let cart = app.get("/ShoppingCart/").await;
    assert!(cart.body.contains("Aja"));
    assert!(cart.body.contains("$10.99"));
}

#[tokio::test]
async fn adding_twice_keeps_one_line_with_quantity_two() {
    let mut app = TestApp::spawn().await;
    let album_id = app.seed_album("Aja", "Steely Dan", 1099).await;

    app.get(&format!("/ShoppingCart/AddToCart/{album_id}")).await;
    app.get(&format!("/ShoppingCart/AddToCart/{album_id}")).await;

    let rows = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cart_item")
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(cart_item_quantity(&app).await, 2);

    let cart = app.get("/ShoppingCart/").await;
    assert!(cart.body.contains("$21.98"), "line total reflects quantity");
}

#[tokio::test]
async fn removal_without_a_token_is_rejected_and_mutates_nothing() {
    let mut app = TestApp::spawn().await;
    let album_id = app.seed_album("Aja", "Steely Dan", 1099).await;
    app.get(&format!("/ShoppingCart/AddToCart/{album_id}")).await;
    let item_id = cart_item_id(&app).await;

    let response = app
        .post_form(&format!("/ShoppingCart/RemoveFromCart/{item_id}"), "")
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(cart_item_quantity(&app).await, 1, "cart untouched");
}

#[tokio::test]
async fn removal_with_a_malformed_token_is_rejected() {
    let mut app = TestApp::spawn().await;
    let album_id = app.seed_album("Aja", "Steely Dan", 1099).await;
    app.get(&format!("/ShoppingCart/AddToCart/{album_id}")).await;
    let item_id = cart_item_id(&app).await;

    // A cart page visit issues the session token; submit something else.
    app.get("/ShoppingCart/").await;

    let response = app
        .post_form(
            &format!("/ShoppingCart/RemoveFromCart/{item_id}"),
            "RequestVerificationToken=only-one-part",
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .post_form(
            &format!("/ShoppingCart/RemoveFromCart/{item_id}"),
            "RequestVerificationToken=forged%3Aforged",
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(cart_item_quantity(&app).await, 1, "cart untouched");
}

#[tokio::test]
async fn removal_with_the_page_token_returns_the_confirmation_payload() {
    let mut app = TestApp::spawn().await;
    let album_id = app.seed_album("Aja", "Steely Dan", 1099).await;

    app.get(&format!("/ShoppingCart/AddToCart/{album_id}")).await;
    app.get(&format!("/ShoppingCart/AddToCart/{album_id}")).await;

    let cart = app.get("/ShoppingCart/").await;
    let token_pair = extract_removal_token(&cart.body).unwrap();
    let item_id = cart_item_id(&app).await;

    let response = app
        .post_form(
            &format!("/ShoppingCart/RemoveFromCart/{item_id}"),
            &encode_token_form(&token_pair),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let json = response.json();
    assert_eq!(
        json["Message"],
        "1 copy of Aja has been removed from your shopping cart."
    );
    assert_eq!(json["CartTotal"], "10.99");
    assert_eq!(json["CartCount"], 1);
    assert_eq!(json["ItemCount"], 1);
    assert_eq!(json["DeleteId"], item_id);

    assert_eq!(cart_item_quantity(&app).await, 1);
}

#[tokio::test]
async fn removing_the_same_item_twice_reports_a_noop() {
    let mut app = TestApp::spawn().await;
    let album_id = app.seed_album("Aja", "Steely Dan", 1099).await;
    app.get(&format!("/ShoppingCart/AddToCart/{album_id}")).await;

    let cart = app.get("/ShoppingCart/").await;
    let token_pair = extract_removal_token(&cart.body).unwrap();
    let item_id = cart_item_id(&app).await;
    let path = format!("/ShoppingCart/RemoveFromCart/{item_id}");
    let form = encode_token_form(&token_pair);

    let first = app.post_form(&path, &form).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.json()["ItemCount"], 1);

    let second = app.post_form(&path, &form).await;
    assert_eq!(second.status, StatusCode::OK);

    let json = second.json();
    assert_eq!(
        json["Message"],
        "The item has already been removed from your shopping cart."
    );
    assert_eq!(json["CartTotal"], "0.00");
    assert_eq!(json["CartCount"], 0);
    assert_eq!(json["ItemCount"], 0);
    assert_eq!(json["DeleteId"], item_id);
}

#[tokio::test]
async fn removal_handle_is_scoped_to_the_owning_cart() {
    // Browser A fills a cart; browser B tries to remove A's item.
    let mut app = TestApp::spawn().await;
    let album_id = app.seed_album("Aja", "Steely Dan", 1099).await;
    app.get(&format!("/ShoppingCart/AddToCart/{album_id}")).await;
    let item_id = cart_item_id(&app).await;

    let mut other = app.fresh_browser();
    other
        .get(&format!("/ShoppingCart/AddToCart/{album_id}"))
        .await;
    let cart = other.get("/ShoppingCart/").await;
    let token_pair = extract_removal_token(&cart.body).unwrap();

    let response = other
        .post_form(
            &format!("/ShoppingCart/RemoveFromCart/{item_id}"),
            &encode_token_form(&token_pair),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["ItemCount"], 0, "foreign item untouched");

    let quantity = sqlx::query_scalar::<_, i64>(
        "SELECT quantity FROM cart_item WHERE id = ?1",
    )
    .bind(item_id)
    .fetch_one(app.pool())
    .await
    .unwrap();
    assert_eq!(quantity, 1);
}
