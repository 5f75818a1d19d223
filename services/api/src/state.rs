//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    fallback::ReferenceData,
    oauth::OAuthService,
    repositories::{
        UserRepository, analytics::AnalyticsRepository, movie::MovieRepository,
        profile::ProfileRepository, watchlist::WatchlistRepository,
    },
    session::SessionService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub movie_repository: MovieRepository,
    pub profile_repository: ProfileRepository,
    pub watchlist_repository: WatchlistRepository,
    pub analytics_repository: AnalyticsRepository,
    pub session: SessionService,
    pub oauth: OAuthService,
    pub reference_data: Arc<ReferenceData>,
}
