//! IBM Cloud Authentication
//!
//! Handles IAM API-key authentication with token caching, plus a fixed
//! bearer-token authenticator for callers that already hold a token.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use url::Url;

use super::http::HttpClient;

/// Environment variable holding the janitor's own API key
pub const DEFAULT_API_KEY_ENV: &str = "IBMCLOUD_API_KEY";

/// Grant type for exchanging an API key at the IAM token endpoint
const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Token expiry buffer - refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Fallback TTL when IAM does not report one
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Secret string that never prints and is overwritten on drop
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        let mut bytes = std::mem::take(&mut self.0).into_bytes();
        bytes.iter_mut().for_each(|b| *b = 0);
        std::hint::black_box(&bytes);
    }
}

/// Reject values the IAM service is known to refuse
fn validate_credential(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        bail!("The {} property is required but was not specified", name);
    }
    let bad = |c: char| c == '{' || c == '}' || c == '"';
    if value.starts_with(bad) || value.ends_with(bad) {
        bail!(
            "The {} property value must not be enclosed in braces or quotes",
            name
        );
    }
    Ok(())
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

enum Credential {
    IamApiKey {
        api_key: Secret,
        token_url: Url,
        http: HttpClient,
    },
    Bearer(Secret),
}

/// Produces bearer tokens for IBM Cloud API calls
#[derive(Clone)]
pub struct Authenticator {
    credential: Arc<Credential>,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Authenticator exchanging `api_key` at `{iam_endpoint}/identity/token`
    pub fn iam(api_key: impl Into<String>, iam_endpoint: &Url, http: HttpClient) -> Result<Self> {
        let token_url = iam_endpoint
            .join("identity/token")
            .context("Invalid IAM endpoint")?;

        Ok(Self::from_credential(Credential::IamApiKey {
            api_key: Secret::new(api_key),
            token_url,
            http,
        }))
    }

    /// Authenticator handing out a fixed token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::from_credential(Credential::Bearer(Secret::new(token)))
    }

    fn from_credential(credential: Credential) -> Self {
        Self {
            credential: Arc::new(credential),
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self.credential.as_ref() {
            Credential::IamApiKey { .. } => "iam",
            Credential::Bearer(_) => "bearer",
        }
    }

    /// Check the credential is usable before any network call
    pub fn validate(&self) -> Result<()> {
        match self.credential.as_ref() {
            Credential::IamApiKey { api_key, .. } => validate_credential("ApiKey", api_key.expose()),
            Credential::Bearer(token) => validate_credential("BearerToken", token.expose()),
        }
    }

    /// Get an access token for API calls
    pub async fn token(&self) -> Result<String> {
        let (api_key, token_url, http) = match self.credential.as_ref() {
            Credential::Bearer(token) => return Ok(token.expose().to_string()),
            Credential::IamApiKey {
                api_key,
                token_url,
                http,
            } => (api_key, token_url, http),
        };

        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached IAM token expired, fetching new token");
            }
        }

        let request = http
            .inner()
            .post(token_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("grant_type", APIKEY_GRANT_TYPE), ("apikey", api_key.expose())]);

        let body = http
            .execute("POST", token_url.path(), request)
            .await
            .context("Failed to get IAM access token")?
            .context("IAM returned an empty token response")?;

        let response: TokenResponse =
            serde_json::from_value(body).context("Failed to parse IAM token response")?;

        let ttl = response
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_TTL);
        let expires_at = Instant::now() + ttl.saturating_sub(TOKEN_EXPIRY_BUFFER);

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: response.access_token.clone(),
                expires_at,
            });
        }

        tracing::debug!(
            "New IAM token cached, expires in ~{} minutes",
            ttl.saturating_sub(TOKEN_EXPIRY_BUFFER).as_secs() / 60
        );

        Ok(response.access_token)
    }
}

/// Build the janitor's authenticator from the API key in `env_var`
pub fn get_authenticator(env_var: &str, iam_endpoint: &Url, http: &HttpClient) -> Result<Authenticator> {
    let api_key = std::env::var(env_var)
        .with_context(|| format!("Environment variable {} is not set", env_var))?;

    let authenticator = Authenticator::iam(api_key, iam_endpoint, http.clone())?;
    authenticator.validate()?;
    Ok(authenticator)
}
