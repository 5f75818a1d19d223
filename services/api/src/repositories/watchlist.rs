//! Watchlist repository for database operations
//!
//! The one-entry-per-(user, movie) invariant lives in a unique constraint;
//! duplicate adds resolve at the store instead of racing an application
//! check.

use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::movie::Movie;
use crate::repositories::movie::movie_from_row;

/// Result of a watchlist add
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new entry was created
    Added(Uuid),
    /// The movie was already on the list; nothing was written
    AlreadyPresent,
}

/// Watchlist repository
#[derive(Clone)]
pub struct WatchlistRepository {
    pool: PgPool,
}

impl WatchlistRepository {
    /// Create a new watchlist repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the movies on a user's watchlist, newest addition first
    ///
    /// Entries whose movie no longer exists simply drop out of the join;
    /// data drift is not an error.
    pub async fn list_movies(&self, user_id: Uuid) -> Result<Vec<Movie>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.title, m.description, m.thumbnail_url, m.video_url, m.genres,
                   m.release_year, m.maturity_rating, m.duration, m.cast_members,
                   m.trending, m.popularity, m.release_date
            FROM watchlist w
            INNER JOIN movies m ON m.id = w.movie_id
            WHERE w.user_id = $1
            ORDER BY w.added_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(movie_from_row).collect())
    }

    /// Add a movie to a user's watchlist
    ///
    /// Idempotent: a second add for the same (user, movie) pair reports
    /// [`AddOutcome::AlreadyPresent`] without writing a duplicate.
    pub async fn add(&self, user_id: Uuid, movie_id: Uuid) -> Result<AddOutcome> {
        let row = sqlx::query(
            r#"
            INSERT INTO watchlist (user_id, movie_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, movie_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some(row) => AddOutcome::Added(row.get("id")),
            None => AddOutcome::AlreadyPresent,
        })
    }

    /// Remove a movie from a user's watchlist; false when no entry existed
    pub async fn remove(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND movie_id = $2")
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::tests::test_pool;
    use serial_test::serial;

    async fn fixtures(pool: &PgPool) -> (Uuid, Uuid) {
        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (name, email) VALUES ('Fixture', $1) RETURNING id",
        )
        .bind(format!("fixture-{}@example.com", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap();

        let movie_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO movies (title, description, thumbnail_url, video_url,
                                release_year, maturity_rating, duration)
            VALUES ($1, 'Fixture movie', '', '', '2024', 'PG-13', '1h 30m')
            RETURNING id
            "#,
        )
        .bind(format!("Watchlist Fixture {}", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap();

        (user_id, movie_id)
    }

    #[tokio::test]
    #[serial]
    async fn test_add_is_idempotent() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = WatchlistRepository::new(pool.clone());
        let (user_id, movie_id) = fixtures(&pool).await;

        let first = repo.add(user_id, movie_id).await.unwrap();
        assert!(matches!(first, AddOutcome::Added(_)));

        let second = repo.add(user_id, movie_id).await.unwrap();
        assert_eq!(second, AddOutcome::AlreadyPresent);

        let movies = repo.list_movies(user_id).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, movie_id);
    }

    #[tokio::test]
    #[serial]
    async fn test_remove_missing_entry_reports_absence() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = WatchlistRepository::new(pool.clone());
        let (user_id, movie_id) = fixtures(&pool).await;

        assert!(!repo.remove(user_id, movie_id).await.unwrap());

        repo.add(user_id, movie_id).await.unwrap();
        assert!(repo.remove(user_id, movie_id).await.unwrap());
        assert!(repo.list_movies(user_id).await.unwrap().is_empty());
    }
}
