//! Sign-in flow tests, including cart migration at sign-in.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use spindle_integration_tests::TestApp;
use spindle_storefront::services::auth::AuthService;

const EMAIL: &str = "fan@example.com";
const PASSWORD: &str = "a-long-password";
const LOGIN_FORM: &str = "email=fan%40example.com&password=a-long-password";

async fn register_user(app: &TestApp) {
    AuthService::new(app.pool())
        .register(EMAIL, PASSWORD)
        .await
        .unwrap();
}

#[tokio::test]
async fn login_page_renders() {
    let mut app = TestApp::spawn().await;
    let response = app.get("/auth/login").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Sign in"));
}

#[tokio::test]
async fn login_with_wrong_credentials_rerenders_the_form() {
    let mut app = TestApp::spawn().await;
    register_user(&app).await;

    let response = app
        .post_form("/auth/login", "email=fan%40example.com&password=wrong-password")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Invalid email or password."));
}

#[tokio::test]
async fn login_establishes_the_session() {
    let mut app = TestApp::spawn().await;
    register_user(&app).await;

    let response = app.post_form("/auth/login", LOGIN_FORM).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let home = app.get("/").await;
    assert!(home.body.contains("Signed in as fan@example.com"));
}

#[tokio::test]
async fn signing_in_migrates_the_anonymous_cart() {
    let mut app = TestApp::spawn().await;
    register_user(&app).await;
    let album_id = app.seed_album("Aja", "Steely Dan", 1099).await;

    // Fill the cart anonymously, then sign in.
    app.get(&format!("/ShoppingCart/AddToCart/{album_id}")).await;
    app.post_form("/auth/login", LOGIN_FORM).await;

    // The line now belongs to the account.
    let owner = sqlx::query_scalar::<_, String>("SELECT cart_id FROM cart_item")
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(owner, EMAIL);

    let cart = app.get("/ShoppingCart/").await;
    assert!(cart.body.contains("Aja"));
}

#[tokio::test]
async fn signing_in_merges_with_an_existing_account_cart() {
    let mut app = TestApp::spawn().await;
    register_user(&app).await;
    let album_id = app.seed_album("Aja", "Steely Dan", 1099).await;

    // A previous signed-in visit left one copy in the account cart.
    let mut earlier = app.fresh_browser();
    earlier.post_form("/auth/login", LOGIN_FORM).await;
    earlier
        .get(&format!("/ShoppingCart/AddToCart/{album_id}"))
        .await;

    // A new anonymous browser adds another copy, then signs in.
    app.get(&format!("/ShoppingCart/AddToCart/{album_id}")).await;
    app.post_form("/auth/login", LOGIN_FORM).await;

    let quantity = sqlx::query_scalar::<_, i64>(
        "SELECT quantity FROM cart_item WHERE cart_id = ?1",
    )
    .bind(EMAIL)
    .fetch_one(app.pool())
    .await
    .unwrap();
    assert_eq!(quantity, 2, "anonymous line merged into the account line");
}

#[tokio::test]
async fn logout_returns_the_browser_to_an_empty_anonymous_cart() {
    let mut app = TestApp::spawn().await;
    register_user(&app).await;
    let album_id = app.seed_album("Aja", "Steely Dan", 1099).await;

    app.get(&format!("/ShoppingCart/AddToCart/{album_id}")).await;
    app.post_form("/auth/login", LOGIN_FORM).await;

    let response = app.post_form("/auth/logout", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    // The account cart persists in storage, but this browser is anonymous
    // again with a fresh cart token.
    let cart = app.get("/ShoppingCart/").await;
    assert!(cart.body.contains("Your cart is empty"));

    let stored = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(quantity), 0) FROM cart_item WHERE cart_id = ?1",
    )
    .bind(EMAIL)
    .fetch_one(app.pool())
    .await
    .unwrap();
    assert_eq!(stored, 1);
}
