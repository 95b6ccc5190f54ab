//! Integration test harness for the Spindle storefront.
//!
//! Drives the full axum application in-process with `tower::ServiceExt`,
//! backed by an in-memory `SQLite` database and the real session layer.
//! A [`TestApp`] behaves like one browser: it carries the session cookie
//! across requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p spindle-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use secrecy::SecretString;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use spindle_core::AlbumId;
use spindle_storefront::config::StorefrontConfig;
use spindle_storefront::db::{MIGRATOR, albums::AlbumRepository};
use spindle_storefront::state::AppState;
use spindle_storefront::{middleware, routes};

/// Response body size limit for tests.
const BODY_LIMIT: usize = 1024 * 1024;

/// A fully wired storefront application plus one browser's cookie jar.
pub struct TestApp {
    router: Router,
    pool: SqlitePool,
    cookie: Option<String>,
}

/// A collected response: status, headers of interest, and the full body.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body is not valid JSON")
    }
}

impl TestApp {
    /// Build the application against a fresh in-memory database.
    ///
    /// A single pooled connection keeps every query on the same in-memory
    /// database.
    ///
    /// # Panics
    ///
    /// Panics if the database or session store cannot be initialized.
    pub async fn spawn() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory database");
        MIGRATOR.run(&pool).await.expect("migrations failed");

        let state = AppState::new(test_config(), pool.clone());
        let session_layer = middleware::create_session_layer(state.pool(), state.config())
            .await
            .expect("failed to initialize session store");

        let router = routes::app(state, session_layer);

        Self {
            router,
            pool,
            cookie: None,
        }
    }

    /// Direct access to the underlying database.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// A second browser against the same application: same database, no
    /// cookies.
    #[must_use]
    pub fn fresh_browser(&self) -> Self {
        Self {
            router: self.router.clone(),
            pool: self.pool.clone(),
            cookie: None,
        }
    }

    /// Insert an album into the catalog.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    pub async fn seed_album(&self, title: &str, artist: &str, price_cents: i64) -> AlbumId {
        AlbumRepository::new(&self.pool)
            .insert(title, artist, price_cents)
            .await
            .expect("failed to seed album")
            .id
    }

    /// Issue a GET request, carrying this browser's session cookie.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self
            .request_builder(path)
            .body(Body::empty())
            .expect("failed to build request");
        self.send(request).await
    }

    /// Issue a POST with a urlencoded form body.
    pub async fn post_form(&mut self, path: &str, body: &str) -> TestResponse {
        let request = self
            .request_builder(path)
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        self.send(request).await
    }

    fn request_builder(&self, path: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        self.store_cookie(&response);

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .expect("failed to read response body");
        let body = String::from_utf8(bytes.to_vec()).expect("response body is not UTF-8");

        TestResponse {
            status,
            location,
            body,
        }
    }

    /// Remember the session cookie from a response, like a browser would.
    fn store_cookie(&mut self, response: &Response) {
        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            // Keep only the `name=value` pair, drop the attributes.
            if let Some(pair) = set_cookie.split(';').next() {
                self.cookie = Some(pair.to_string());
            }
        }
    }
}

/// Pull the `RequestVerificationToken` value out of a rendered cart page.
#[must_use]
pub fn extract_removal_token(html: &str) -> Option<String> {
    let marker = "name=\"RequestVerificationToken\" value=\"";
    let start = html.find(marker)? + marker.len();
    let rest = html.get(start..)?;
    let end = rest.find('"')?;
    rest.get(..end).map(str::to_string)
}

/// Form-encode a removal token pair (the `:` needs escaping).
#[must_use]
pub fn encode_token_form(token_pair: &str) -> String {
    format!(
        "RequestVerificationToken={}",
        token_pair.replace(':', "%3A")
    )
}

fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost".to_string(),
        session_secret: SecretString::from("integration-test-session-secret!"),
        sentry_dsn: None,
    }
}
