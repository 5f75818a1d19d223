//! OAuth2 integration for Google and GitHub providers
//!
//! The handshake carries no server-side state: the PKCE verifier and the
//! post-login redirect ride in a short-lived signed JWT used as the
//! `state` parameter, and come back on the callback. Redirect targets are
//! allow-listed against the configured base URL.

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl, basic::BasicClient,
    url::Url,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Handshake state lifetime in seconds
const STATE_EXPIRY: u64 = 600;

/// OAuth2 provider types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Github,
}

impl OAuthProvider {
    /// Get the provider name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Github => "github",
        }
    }

    /// Parse a provider path segment
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "google" => Some(OAuthProvider::Google),
            "github" => Some(OAuthProvider::Github),
            _ => None,
        }
    }
}

/// Client id/secret pair for one provider
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// OAuth configuration for all providers
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    /// Base URL used for callback construction and redirect allow-listing
    pub base_url: String,
    pub google: Option<ProviderCredentials>,
    pub github: Option<ProviderCredentials>,
}

impl OAuthSettings {
    /// Create new OAuthSettings from environment variables
    ///
    /// # Environment Variables
    /// - `BASE_URL`: public base URL (default: "http://localhost:3000")
    /// - `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET`
    /// - `GITHUB_CLIENT_ID` / `GITHUB_CLIENT_SECRET`
    ///
    /// A provider missing either credential is simply not registered.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        OAuthSettings {
            base_url,
            google: credentials_from_env("GOOGLE"),
            github: credentials_from_env("GITHUB"),
        }
    }

    /// Check a requested post-login redirect against the base URL
    ///
    /// Compares scheme, host, and port; a plain prefix check would let
    /// `http://localhost:3000.evil.example.com` through.
    pub fn is_allowed_redirect(&self, redirect: &str) -> bool {
        let (Ok(base), Ok(candidate)) = (Url::parse(&self.base_url), Url::parse(redirect)) else {
            return false;
        };

        candidate.scheme() == base.scheme()
            && candidate.host_str() == base.host_str()
            && candidate.port_or_known_default() == base.port_or_known_default()
    }
}

fn credentials_from_env(prefix: &str) -> Option<ProviderCredentials> {
    let client_id = std::env::var(format!("{}_CLIENT_ID", prefix)).ok()?;
    let client_secret = std::env::var(format!("{}_CLIENT_SECRET", prefix)).ok()?;
    Some(ProviderCredentials {
        client_id,
        client_secret,
    })
}

/// OAuth2 client wrapper
#[derive(Clone)]
pub struct OAuthClient {
    provider: OAuthProvider,
    client: BasicClient,
}

impl OAuthClient {
    /// Create a new OAuth2 client for a provider
    pub fn new(
        provider: OAuthProvider,
        credentials: &ProviderCredentials,
        base_url: &str,
    ) -> Result<Self> {
        let (auth_url, token_url) = match provider {
            OAuthProvider::Google => (
                "https://accounts.google.com/o/oauth2/v2/auth",
                "https://oauth2.googleapis.com/token",
            ),
            OAuthProvider::Github => (
                "https://github.com/login/oauth/authorize",
                "https://github.com/login/oauth/access_token",
            ),
        };

        let redirect_url = format!("{}/api/auth/oauth/{}/callback", base_url, provider.as_str());

        let client = BasicClient::new(
            ClientId::new(credentials.client_id.clone()),
            Some(ClientSecret::new(credentials.client_secret.clone())),
            AuthUrl::new(auth_url.to_string())?,
            Some(TokenUrl::new(token_url.to_string())?),
        )
        .set_redirect_uri(RedirectUrl::new(redirect_url)?);

        Ok(Self { provider, client })
    }

    fn scopes(&self) -> &'static [&'static str] {
        match self.provider {
            OAuthProvider::Google => &["openid", "email", "profile"],
            OAuthProvider::Github => &["read:user", "user:email"],
        }
    }

    /// Build the authorization URL carrying the given state and PKCE challenge
    pub fn authorize_url(&self, state: String, pkce_challenge: PkceCodeChallenge) -> String {
        let mut request = self
            .client
            .authorize_url(|| CsrfToken::new(state))
            .set_pkce_challenge(pkce_challenge);

        for scope in self.scopes() {
            request = request.add_scope(Scope::new(scope.to_string()));
        }

        let (auth_url, _) = request.url();
        auth_url.to_string()
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(
        &self,
        code: String,
        pkce_verifier: PkceCodeVerifier,
    ) -> Result<
        oauth2::StandardTokenResponse<oauth2::EmptyExtraTokenFields, oauth2::basic::BasicTokenType>,
    > {
        info!(
            "Exchanging authorization code for access token for {:?}",
            self.provider
        );

        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(oauth2::reqwest::async_http_client)
            .await?;

        Ok(token_response)
    }

    /// Get user profile information from the provider
    pub async fn get_user_profile(&self, access_token: &str) -> Result<OAuthUserProfile> {
        info!("Getting user profile for {:?}", self.provider);

        match self.provider {
            OAuthProvider::Google => self.get_google_user_profile(access_token).await,
            OAuthProvider::Github => self.get_github_user_profile(access_token).await,
        }
    }

    async fn get_google_user_profile(&self, access_token: &str) -> Result<OAuthUserProfile> {
        let client = reqwest::Client::new();
        let response = client
            .get("https://www.googleapis.com/oauth2/v2/userinfo")
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to get Google user profile: {}",
                response.status()
            ));
        }

        let google_user: GoogleUser = response.json().await?;
        Ok(OAuthUserProfile {
            email: google_user.email,
            name: google_user.name,
        })
    }

    async fn get_github_user_profile(&self, access_token: &str) -> Result<OAuthUserProfile> {
        let client = reqwest::Client::new();
        let response = client
            .get("https://api.github.com/user")
            .header(reqwest::header::USER_AGENT, "netclicks")
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to get GitHub user profile: {}",
                response.status()
            ));
        }

        let github_user: GithubUser = response.json().await?;
        let email = github_user
            .email
            .ok_or_else(|| anyhow::anyhow!("GitHub account exposes no email address"))?;

        Ok(OAuthUserProfile {
            email,
            name: github_user.name.or(Some(github_user.login)),
        })
    }
}

/// Google user profile response
#[derive(Debug, Deserialize)]
struct GoogleUser {
    email: String,
    name: Option<String>,
}

/// GitHub user profile response
#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
    name: Option<String>,
    email: Option<String>,
}

/// OAuth user profile information
#[derive(Debug, Clone)]
pub struct OAuthUserProfile {
    pub email: String,
    pub name: Option<String>,
}

/// Signed handshake state carried through the provider round-trip
#[derive(Debug, Serialize, Deserialize)]
struct HandshakeClaims {
    /// Random nonce
    csrf: String,
    /// PKCE verifier for the code exchange
    verifier: String,
    /// Provider the handshake was started for
    provider: String,
    /// Allow-listed post-login redirect, echoed back to the client
    redirect: Option<String>,
    /// Issued at time
    iat: u64,
    /// Expiration time
    exp: u64,
}

/// OAuth service holding the registered provider clients
#[derive(Clone)]
pub struct OAuthService {
    settings: OAuthSettings,
    google: Option<OAuthClient>,
    github: Option<OAuthClient>,
    state_encoding: EncodingKey,
    state_decoding: DecodingKey,
    state_validation: Validation,
}

impl OAuthService {
    /// Register clients for every configured provider
    pub fn new(settings: OAuthSettings, secret: &str) -> Result<Self> {
        let google = settings
            .google
            .as_ref()
            .map(|c| OAuthClient::new(OAuthProvider::Google, c, &settings.base_url))
            .transpose()?;
        let github = settings
            .github
            .as_ref()
            .map(|c| OAuthClient::new(OAuthProvider::Github, c, &settings.base_url))
            .transpose()?;

        let mut state_validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        state_validation.validate_exp = true;

        Ok(Self {
            settings,
            google,
            github,
            state_encoding: EncodingKey::from_secret(secret.as_bytes()),
            state_decoding: DecodingKey::from_secret(secret.as_bytes()),
            state_validation,
        })
    }

    /// Check a requested post-login redirect against the base URL
    pub fn is_allowed_redirect(&self, redirect: &str) -> bool {
        self.settings.is_allowed_redirect(redirect)
    }

    fn client(&self, provider: OAuthProvider) -> Result<&OAuthClient> {
        let client = match provider {
            OAuthProvider::Google => self.google.as_ref(),
            OAuthProvider::Github => self.github.as_ref(),
        };

        client.ok_or_else(|| anyhow::anyhow!("Provider {} is not configured", provider.as_str()))
    }

    /// Start a handshake; returns the provider authorization URL
    pub fn begin(&self, provider: OAuthProvider, redirect: Option<String>) -> Result<String> {
        let client = self.client(provider)?;

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let state = self.encode_state(HandshakeClaims {
            csrf: CsrfToken::new_random().secret().clone(),
            verifier: pkce_verifier.secret().clone(),
            provider: provider.as_str().to_string(),
            redirect,
            iat: unix_now()?,
            exp: unix_now()? + STATE_EXPIRY,
        })?;

        Ok(client.authorize_url(state, pkce_challenge))
    }

    /// Finish a handshake; returns the provider profile and the redirect
    pub async fn complete(
        &self,
        provider: OAuthProvider,
        code: String,
        state: &str,
    ) -> Result<(OAuthUserProfile, Option<String>)> {
        let claims = self.decode_state(state)?;
        if claims.provider != provider.as_str() {
            return Err(anyhow::anyhow!("Handshake state names another provider"));
        }

        let client = self.client(provider)?;
        let token = client
            .exchange_code(code, PkceCodeVerifier::new(claims.verifier))
            .await?;
        let profile = client
            .get_user_profile(token.access_token().secret())
            .await?;

        Ok((profile, claims.redirect))
    }

    fn encode_state(&self, claims: HandshakeClaims) -> Result<String> {
        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &self.state_encoding,
        )?;
        Ok(token)
    }

    fn decode_state(&self, state: &str) -> Result<HandshakeClaims> {
        let data = decode::<HandshakeClaims>(state, &self.state_decoding, &self.state_validation)?;
        Ok(data.claims)
    }
}

fn unix_now() -> Result<u64> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
        .as_secs();
    Ok(now)
}
