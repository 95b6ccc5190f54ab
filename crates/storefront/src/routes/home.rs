//! Album catalog page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::albums::AlbumRepository;
use crate::error::AppError;
use crate::models::{Album, CurrentUser, session_keys};
use crate::state::AppState;

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub albums: Vec<AlbumView>,
    pub user_email: Option<String>,
}

/// One album as rendered on the catalog page.
pub struct AlbumView {
    pub id: i32,
    pub title: String,
    pub artist: String,
    pub price: String,
}

impl From<&Album> for AlbumView {
    fn from(album: &Album) -> Self {
        Self {
            id: album.id.as_i32(),
            title: album.title.clone(),
            artist: album.artist.clone(),
            price: album.price().display(),
        }
    }
}

/// GET / - list the catalog, newest first.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
) -> Result<HomeTemplate, AppError> {
    let albums = AlbumRepository::new(state.pool()).list().await?;
    let user = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;

    Ok(HomeTemplate {
        albums: albums.iter().map(AlbumView::from).collect(),
        user_email: user.map(|u| u.email.to_string()),
    })
}
