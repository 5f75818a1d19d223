//! Profile repository for database operations
//!
//! The 5-profile cap and the one-shot default provisioning use conditional
//! inserts, so the check and the write are one statement. Under READ
//! COMMITTED two concurrent statements can still both pass the subquery, so
//! the cap and the provisioning remain best-effort; only the watchlist
//! unique constraint is airtight.

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::profile::{MAX_PROFILES_PER_USER, Profile, UpdateProfileRequest};

const PROFILE_COLUMNS: &str = "id, user_id, name, avatar, is_kid, created_at, updated_at";

fn profile_from_row(row: &PgRow) -> Profile {
    Profile {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        avatar: row.get("avatar"),
        is_kid: row.get("is_kid"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Profile repository
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all profiles owned by a user
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Profile>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE user_id = $1 ORDER BY created_at ASC",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(profile_from_row).collect())
    }

    /// Insert the two default profiles for a user that has none
    ///
    /// The insert is a no-op when any committed profile already exists.
    /// Returns the inserted rows; empty means another request provisioned
    /// first.
    pub async fn provision_defaults(
        &self,
        user_id: Uuid,
        display_name: &str,
        avatar: &str,
    ) -> Result<Vec<Profile>> {
        info!("Provisioning default profiles for user: {}", user_id);

        let rows = sqlx::query(&format!(
            r#"
            INSERT INTO profiles (user_id, name, avatar, is_kid)
            SELECT $1, v.name, $3, v.is_kid
            FROM (VALUES ($2::text, FALSE), ('Kids', TRUE)) AS v(name, is_kid)
            WHERE NOT EXISTS (SELECT 1 FROM profiles WHERE user_id = $1)
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(display_name)
        .bind(avatar)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(profile_from_row).collect())
    }

    /// Create a profile, respecting the per-user cap
    ///
    /// Returns None when the user already owns the maximum number of
    /// profiles. The count check and the insert are a single statement,
    /// though concurrent creates can still read the same count.
    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        avatar: &str,
        is_kid: bool,
    ) -> Result<Option<Profile>> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO profiles (user_id, name, avatar, is_kid)
            SELECT $1, $2, $3, $4
            WHERE (SELECT COUNT(*) FROM profiles WHERE user_id = $1) < $5
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(name)
        .bind(avatar)
        .bind(is_kid)
        .bind(MAX_PROFILES_PER_USER)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(profile_from_row))
    }

    /// Patch name/avatar/kids-flag on an owned profile
    ///
    /// Returns None when the profile does not exist or is not owned by the
    /// user.
    pub async fn update(
        &self,
        user_id: Uuid,
        profile_id: Uuid,
        fields: &UpdateProfileRequest,
    ) -> Result<Option<Profile>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE profiles
            SET name = COALESCE($3, name),
                avatar = COALESCE($4, avatar),
                is_kid = COALESCE($5, is_kid),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(profile_id)
        .bind(user_id)
        .bind(&fields.name)
        .bind(&fields.avatar)
        .bind(fields.is_kid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(profile_from_row))
    }

    /// Delete an owned profile; false when nothing matched
    pub async fn delete(&self, user_id: Uuid, profile_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1 AND user_id = $2")
            .bind(profile_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::DEFAULT_AVATAR;
    use crate::repositories::tests::test_pool;
    use serial_test::serial;

    async fn test_user(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO users (name, email) VALUES ('Fixture', $1) RETURNING id",
        )
        .bind(format!("fixture-{}@example.com", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn test_provision_defaults_is_idempotent() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = ProfileRepository::new(pool.clone());
        let user_id = test_user(&pool).await;

        let created = repo
            .provision_defaults(user_id, "Ann", DEFAULT_AVATAR)
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert!(!created[0].is_kid);
        assert!(created[1].is_kid);

        // A second provision must be a no-op
        let again = repo
            .provision_defaults(user_id, "Ann", DEFAULT_AVATAR)
            .await
            .unwrap();
        assert!(again.is_empty());

        let listed = repo.list_by_user(user_id).await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    #[serial]
    async fn test_create_respects_profile_cap() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = ProfileRepository::new(pool.clone());
        let user_id = test_user(&pool).await;

        for i in 0..5 {
            let created = repo
                .create(user_id, &format!("Profile {}", i), DEFAULT_AVATAR, false)
                .await
                .unwrap();
            assert!(created.is_some());
        }

        let sixth = repo
            .create(user_id, "One Too Many", DEFAULT_AVATAR, false)
            .await
            .unwrap();
        assert!(sixth.is_none());
        assert_eq!(repo.list_by_user(user_id).await.unwrap().len(), 5);
    }

    #[tokio::test]
    #[serial]
    async fn test_update_and_delete_require_ownership() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = ProfileRepository::new(pool.clone());
        let owner = test_user(&pool).await;
        let stranger = test_user(&pool).await;

        let profile = repo
            .create(owner, "Movie Night", DEFAULT_AVATAR, false)
            .await
            .unwrap()
            .unwrap();

        let fields = UpdateProfileRequest {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };

        // Not the owner: nothing to patch or delete
        assert!(
            repo.update(stranger, profile.id, &fields)
                .await
                .unwrap()
                .is_none()
        );
        assert!(!repo.delete(stranger, profile.id).await.unwrap());

        let updated = repo.update(owner, profile.id, &fields).await.unwrap().unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.avatar, DEFAULT_AVATAR);

        assert!(repo.delete(owner, profile.id).await.unwrap());
        assert!(!repo.delete(owner, profile.id).await.unwrap());
    }
}
