//! Profile models for request and response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// At most this many profiles per user
pub const MAX_PROFILES_PER_USER: i64 = 5;

/// Avatar assigned when a profile is created without one
pub const DEFAULT_AVATAR: &str = "/placeholder-user.jpg";

/// Viewing profile owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub avatar: String,
    pub is_kid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for profile creation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub is_kid: Option<bool>,
}

/// Request for a targeted profile patch
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub is_kid: Option<bool>,
}

/// Response for the profile listing endpoint
#[derive(Serialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<Profile>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}
