use anyhow::Result;
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

mod error;
mod fallback;
mod models;
mod oauth;
mod repositories;
mod routes;
mod session;
mod state;
mod validation;

use common::database::{DatabaseConfig, init_pool};
use tokio::net::TcpListener;

use crate::{
    fallback::ReferenceData,
    oauth::{OAuthService, OAuthSettings},
    repositories::{
        UserRepository, analytics::AnalyticsRepository, movie::MovieRepository,
        profile::ProfileRepository, watchlist::WatchlistRepository,
    },
    session::{SessionConfig, SessionService},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config)?;

    // The pool connects lazily; an unreachable database is not fatal since
    // read endpoints degrade to the static reference data.
    match common::database::health_check(&pool).await {
        Ok(_) => info!("Database connection successful"),
        Err(e) => warn!("Database unreachable at startup, serving fallback data: {}", e),
    }

    let session = SessionService::new(SessionConfig::from_env()?);
    let oauth = OAuthService::new(OAuthSettings::from_env(), session.secret())?;

    // Initialize repositories
    let user_repository = UserRepository::new(pool.clone());
    let movie_repository = MovieRepository::new(pool.clone());
    let profile_repository = ProfileRepository::new(pool.clone());
    let watchlist_repository = WatchlistRepository::new(pool.clone());
    let analytics_repository = AnalyticsRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        user_repository,
        movie_repository,
        profile_repository,
        watchlist_repository,
        analytics_repository,
        session,
        oauth,
        reference_data: Arc::new(ReferenceData::new()),
    };

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    info!("API service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
