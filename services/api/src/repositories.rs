//! Repositories for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;

use crate::models::User;

pub mod analytics;
pub mod movie;
pub mod profile;
pub mod watchlist;

/// Check whether a repository error is a unique-constraint violation
///
/// Registration races past the friendly existence check land here; the
/// route maps them to the same 409 as the check itself.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

pub(crate) fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: row.get("role"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with a credential hash
    pub async fn create(&self, name: &str, email: &str, password: &str) -> Result<User> {
        info!("Creating new user: {}", email);

        let password_hash = hash_password(password)?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row))
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Create or reuse an account for an OAuth sign-in
    ///
    /// OAuth-only accounts carry no credential hash.
    pub async fn upsert_oauth_user(&self, name: &str, email: &str) -> Result<User> {
        info!("Upserting OAuth user: {}", email);

        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, NULL)
            ON CONFLICT (email) DO UPDATE SET updated_at = now()
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row))
    }

    /// Verify a user's password
    pub async fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let Some(stored_hash) = &user.password_hash else {
            // OAuth-only account
            return Ok(false);
        };

        let parsed_hash = PasswordHash::new(stored_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use serial_test::serial;
    use uuid::Uuid;

    /// Connect to the test database, or None to skip the test
    pub(crate) async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("DATABASE_URL").ok()?;
        match PgPool::connect(&url).await {
            Ok(pool) => Some(pool),
            Err(e) => {
                eprintln!("skipping store-backed test: {}", e);
                None
            }
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("secret1").unwrap();
        let user = User {
            id: Uuid::new_v4(),
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password_hash: Some(hash),
            role: "user".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();
        let repo = UserRepository::new(PgPool::connect_lazy("postgresql://localhost").unwrap());
        assert!(rt.block_on(repo.verify_password(&user, "secret1")).unwrap());
        assert!(!rt.block_on(repo.verify_password(&user, "wrong")).unwrap());
    }

    #[test]
    fn test_oauth_account_has_no_password() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password_hash: None,
            role: "user".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();
        let repo = UserRepository::new(PgPool::connect_lazy("postgresql://localhost").unwrap());
        assert!(!rt.block_on(repo.verify_password(&user, "anything")).unwrap());
    }

    #[tokio::test]
    #[serial]
    async fn test_duplicate_email_hits_unique_constraint() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = UserRepository::new(pool);

        let email = format!("dup-{}@example.com", Uuid::new_v4());
        repo.create("Ann", &email, "secret1").await.unwrap();

        let err = repo.create("Ann", &email, "secret1").await.unwrap_err();
        assert!(is_unique_violation(&err));
    }
}
