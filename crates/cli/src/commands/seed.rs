//! Catalog seeding command.

use spindle_storefront::db::MIGRATOR;
use spindle_storefront::db::albums::AlbumRepository;
use spindle_storefront::services::auth::AuthService;

use super::{CommandError, connect};

/// Sample catalog: (title, artist, price in cents).
const SAMPLE_ALBUMS: &[(&str, &str, i64)] = &[
    ("Kind of Blue", "Miles Davis", 1299),
    ("Aja", "Steely Dan", 1099),
    ("Gaucho", "Steely Dan", 1099),
    ("Blue Train", "John Coltrane", 1199),
    ("Rumours", "Fleetwood Mac", 999),
    ("Remain in Light", "Talking Heads", 1149),
];

const DEMO_EMAIL: &str = "demo@spindle.test";
const DEMO_PASSWORD: &str = "demo-password";

/// Seed the catalog with sample albums and a demo user.
///
/// Safe to run repeatedly: an already-populated catalog is left alone.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    MIGRATOR.run(&pool).await?;

    let albums = AlbumRepository::new(&pool);
    if !albums.list().await?.is_empty() {
        tracing::info!("Catalog already seeded, skipping");
        return Ok(());
    }

    for (title, artist, price_cents) in SAMPLE_ALBUMS {
        let album = albums.insert(title, artist, *price_cents).await?;
        tracing::info!(%album.id, title, "seeded album");
    }

    let auth = AuthService::new(&pool);
    match auth.register(DEMO_EMAIL, DEMO_PASSWORD).await {
        Ok(user) => tracing::info!(email = %user.email, "seeded demo user"),
        Err(spindle_storefront::services::auth::AuthError::UserAlreadyExists) => {
            tracing::info!("Demo user already exists, skipping");
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!("Seeding complete");
    Ok(())
}
