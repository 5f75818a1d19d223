//! Analytics repository for best-effort event recording

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Analytics repository
///
/// Callers record events on a spawned task and log failures; an analytics
/// write must never fail the operation that triggered it.
#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    /// Create a new analytics repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a user event
    pub async fn record(
        &self,
        user_id: Uuid,
        event_type: &str,
        movie_id: Option<Uuid>,
    ) -> Result<()> {
        sqlx::query("INSERT INTO analytics (user_id, event_type, movie_id) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(event_type)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
