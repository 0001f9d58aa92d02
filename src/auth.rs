//! Access-token acquisition for the Google REST calls.
//!
//! Three sources, tried in order: a raw token from the environment, an
//! authorized-user JSON blob passed base64-encoded in `CREDENTIALS_CONFIG`,
//! or the same JSON read from a credentials file on disk.

use crate::config::ServerConfig;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use parking_lot::Mutex;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

// Refresh a little early so in-flight requests never carry a token that
// expires mid-call.
const EXPIRY_SLACK: Duration = Duration::from_secs(60);

#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// A fixed token handed to us directly; no refresh, the caller owns expiry.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Authorized-user credentials as written by the gcloud OAuth flow.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizedUser {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Exchanges a long-lived refresh token for short-lived access tokens,
/// caching each one until shortly before its expiry.
pub struct RefreshTokenProvider {
    http: reqwest::Client,
    credentials: AuthorizedUser,
    token_endpoint: String,
    cached: Mutex<Option<CachedToken>>,
}

impl RefreshTokenProvider {
    pub fn new(http: reqwest::Client, credentials: AuthorizedUser) -> Self {
        Self {
            http,
            credentials,
            token_endpoint: TOKEN_ENDPOINT.to_string(),
            cached: Mutex::new(None),
        }
    }

    async fn refresh(&self) -> Result<CachedToken> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];
        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&params)
            .send()
            .await
            .context("token refresh request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("token refresh rejected (HTTP {status}): {body}");
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("malformed token refresh response")?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_SLACK);
        Ok(CachedToken {
            token: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}

#[async_trait]
impl TokenProvider for RefreshTokenProvider {
    async fn access_token(&self) -> Result<String> {
        if let Some(cached) = self.cached.lock().as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.token.clone());
            }
        }

        let fresh = self.refresh().await?;
        let token = fresh.token.clone();
        *self.cached.lock() = Some(fresh);
        Ok(token)
    }
}

fn parse_authorized_user(raw: &[u8]) -> Result<AuthorizedUser> {
    serde_json::from_slice(raw).context("credentials are not authorized-user JSON")
}

/// Pick a token source from the configuration, preferring a direct access
/// token, then inline credentials, then the credentials file.
pub async fn build_token_provider(
    config: &ServerConfig,
    http: reqwest::Client,
) -> Result<Arc<dyn TokenProvider>> {
    if let Some(token) = &config.access_token {
        tracing::info!("using static access token from environment");
        return Ok(Arc::new(StaticTokenProvider::new(token.clone())));
    }

    if let Some(encoded) = &config.credentials_config {
        let raw = BASE64
            .decode(encoded.trim())
            .context("CREDENTIALS_CONFIG is not valid base64")?;
        let credentials = parse_authorized_user(&raw)?;
        tracing::info!("using inline OAuth credentials");
        return Ok(Arc::new(RefreshTokenProvider::new(http, credentials)));
    }

    let path = &config.credentials_path;
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read credentials file '{}'", path.display()))?;
    let credentials = parse_authorized_user(&raw)?;
    tracing::info!(path = %path.display(), "using OAuth credentials file");
    Ok(Arc::new(RefreshTokenProvider::new(http, credentials)))
}
