//! Movie catalog repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::models::movie::{CatalogQuery, Category, Movie, NewMovie};

const MOVIE_COLUMNS: &str = "id, title, description, thumbnail_url, video_url, genres, \
     release_year, maturity_rating, duration, cast_members, trending, popularity, release_date";

pub(crate) fn movie_from_row(row: &PgRow) -> Movie {
    Movie {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        thumbnail_url: row.get("thumbnail_url"),
        video_url: row.get("video_url"),
        genres: row.get("genres"),
        release_year: row.get("release_year"),
        maturity_rating: row.get("maturity_rating"),
        duration: row.get("duration"),
        cast_members: row.get("cast_members"),
        trending: row.get("trending"),
        popularity: row.get("popularity"),
        release_date: row.get("release_date"),
    }
}

/// Movie catalog repository
#[derive(Clone)]
pub struct MovieRepository {
    pool: PgPool,
}

impl MovieRepository {
    /// Create a new movie repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a movie exists
    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM movies WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Search the catalog with category, genre, and free-text filters
    ///
    /// The total count is computed over the full filtered set, independent
    /// of the requested page window.
    pub async fn search(&self, query: &CatalogQuery) -> Result<(Vec<Movie>, i64)> {
        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM movies");
        push_filters(&mut count_builder, query);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::new(format!("SELECT {} FROM movies", MOVIE_COLUMNS));
        push_filters(&mut builder, query);

        builder.push(match query.category {
            Some(Category::Trending) | Some(Category::Top10) => " ORDER BY popularity DESC",
            Some(Category::New) => " ORDER BY release_date DESC NULLS LAST",
            Some(Category::Popular) | None => " ORDER BY title ASC",
        });
        builder.push(" LIMIT ");
        builder.push_bind(query.limit as i64);
        builder.push(" OFFSET ");
        builder.push_bind(query.offset());

        let rows = builder.build().fetch_all(&self.pool).await?;
        let movies = rows.iter().map(movie_from_row).collect();

        Ok((movies, total))
    }

    /// Insert a new catalog record
    pub async fn create(&self, movie: &NewMovie) -> Result<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO movies (title, description, thumbnail_url, video_url, genres,
                                release_year, maturity_rating, duration, cast_members,
                                trending, popularity, release_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(&movie.thumbnail_url)
        .bind(&movie.video_url)
        .bind(&movie.genres)
        .bind(&movie.release_year)
        .bind(&movie.maturity_rating)
        .bind(&movie.duration)
        .bind(&movie.cast_members)
        .bind(movie.trending)
        .bind(movie.popularity)
        .bind(movie.release_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, query: &'a CatalogQuery) {
    let mut separator = " WHERE ";

    match query.category {
        Some(Category::Trending) => {
            builder.push(separator).push("trending = TRUE");
            separator = " AND ";
        }
        Some(Category::New) => {
            builder
                .push(separator)
                .push("release_date >= now() - interval '3 months'");
            separator = " AND ";
        }
        Some(Category::Popular) => {
            builder.push(separator).push("popularity > 70");
            separator = " AND ";
        }
        Some(Category::Top10) => {
            builder.push(separator).push("popularity > 85");
            separator = " AND ";
        }
        None => {}
    }

    if let Some(genre) = &query.genre {
        builder
            .push(separator)
            .push("EXISTS (SELECT 1 FROM unnest(genres) AS g WHERE lower(g) = lower(");
        builder.push_bind(genre);
        builder.push("))");
        separator = " AND ";
    }

    if let Some(search) = &query.search {
        let pattern = format!("%{}%", search);
        builder.push(separator).push("(title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR description ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR EXISTS (SELECT 1 FROM unnest(cast_members) AS c WHERE c ILIKE ");
        builder.push_bind(pattern);
        builder.push("))");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie::MovieQuery;
    use crate::repositories::tests::test_pool;
    use serial_test::serial;

    fn sample_movie(title: &str) -> NewMovie {
        NewMovie {
            title: title.to_string(),
            description: "A test movie".to_string(),
            thumbnail_url: "https://example.com/t.jpg".to_string(),
            video_url: "https://example.com/v.mp4".to_string(),
            genres: vec!["Drama".to_string()],
            release_year: "2024".to_string(),
            maturity_rating: "PG-13".to_string(),
            duration: "1h 30m".to_string(),
            cast_members: vec!["Test Actor".to_string()],
            trending: true,
            popularity: 99,
            release_date: None,
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_create_and_search_by_title() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = MovieRepository::new(pool.clone());

        let title = format!("Search Fixture {}", Uuid::new_v4());
        let id = repo.create(&sample_movie(&title)).await.unwrap();
        assert!(repo.exists(id).await.unwrap());

        let query = CatalogQuery::from_params(&MovieQuery {
            search: Some(title.clone()),
            ..Default::default()
        });
        let (movies, total) = repo.search(&query).await.unwrap();

        assert_eq!(total, 1);
        assert_eq!(movies[0].title, title);

        sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();
    }
}
