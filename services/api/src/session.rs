//! Session token service and identity resolution
//!
//! Sessions are stateless HS256 JWTs issued at login. Handlers that need a
//! caller identity take [`Identity`] as an extractor argument; resolution
//! failure is a 401 before any handler code runs. Nothing outside this
//! module looks at the token format.

use anyhow::Result;
use axum::{RequestPartsExt, async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::{error::ApiError, models::User, state::AppState};

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Secret used to sign and verify session tokens
    pub secret: String,
    /// Session token expiration time in seconds (default: 24 hours)
    pub token_expiry: u64,
}

impl SessionConfig {
    /// Create a new SessionConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SESSION_SECRET`: signing secret for session tokens (required)
    /// - `SESSION_TOKEN_EXPIRY`: token expiry in seconds (default: 86400)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET environment variable not set"))?;

        let token_expiry = std::env::var("SESSION_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .unwrap_or(86400);

        Ok(SessionConfig {
            secret,
            token_expiry,
        })
    }
}

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// User email
    pub email: String,
    /// Display name
    pub name: String,
    /// User role
    pub role: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Authenticated identity attached to a request
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl Identity {
    /// Check whether the caller carries the admin role
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Session token service
#[derive(Clone)]
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: SessionConfig,
}

impl SessionService {
    /// Initialize a new session service
    pub fn new(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        SessionService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Issue a session token for a user
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            iat: now,
            exp: now + self.config.token_expiry,
        };

        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?;
        Ok(token)
    }

    /// Resolve a bearer token into an authenticated identity
    pub fn resolve(&self, token: &str) -> Result<Identity> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = token_data.claims;

        Ok(Identity {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        })
    }

    /// Get the session token expiry time
    pub fn token_expiry(&self) -> u64 {
        self.config.token_expiry
    }

    /// Signing secret, shared with the OAuth handshake state tokens
    pub fn secret(&self) -> &str {
        &self.config.secret
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ApiError::Unauthorized)?;

        state
            .session
            .resolve(bearer.token())
            .map_err(|_| ApiError::Unauthorized)
    }
}
