//! PowerVS session
//!
//! An authenticated handle scoped to one region, zone and account. Every
//! resource call goes through [`PowerTransport`], which `Session` implements
//! over HTTP.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::auth::Authenticator;
use super::http::HttpClient;
use crate::error::ProviderApiError;

/// Inputs for [`Session::new`]
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub authenticator: Authenticator,
    pub region: String,
    pub zone: String,
    pub user_account: String,
    pub debug: bool,
    /// Overrides the regional PowerVS endpoint
    pub endpoint: Option<Url>,
}

/// Provider resource API, addressed relative to a service instance
///
/// Errors carry `path` as given, relative to the service instance.
#[async_trait]
pub trait PowerTransport: Send + Sync {
    /// GET `path` under the service instance; an empty reply is `Value::Null`
    async fn get(&self, cloud_instance_id: &str, path: &str) -> Result<Value, ProviderApiError>;

    /// DELETE `path` under the service instance
    async fn delete(&self, cloud_instance_id: &str, path: &str) -> Result<(), ProviderApiError>;
}

/// Regional PowerVS API endpoint
pub fn regional_endpoint(region: &str) -> Result<Url> {
    if !region
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        bail!("region {:?} contains invalid characters", region);
    }
    Url::parse(&format!("https://{}.power-iaas.cloud.ibm.com/", region))
        .with_context(|| format!("Failed to build endpoint for region {:?}", region))
}

/// Authenticated PowerVS session
#[derive(Debug, Clone)]
pub struct Session {
    authenticator: Authenticator,
    http: HttpClient,
    base_url: Url,
    region: String,
    zone: String,
    user_account: String,
}

impl Session {
    pub fn new(options: SessionOptions, http: HttpClient) -> Result<Self> {
        let SessionOptions {
            authenticator,
            region,
            zone,
            user_account,
            debug,
            endpoint,
        } = options;

        if region.trim().is_empty() {
            bail!("region is required");
        }
        if zone.trim().is_empty() {
            bail!("zone is required");
        }
        if user_account.trim().is_empty() {
            bail!("user account is required");
        }
        authenticator
            .validate()
            .context("authenticator is not usable")?;

        let base_url = match endpoint {
            Some(url) => url,
            None => regional_endpoint(&region)?,
        };
        if base_url.cannot_be_a_base() {
            bail!("endpoint {} cannot be used as a base URL", base_url);
        }

        tracing::debug!(
            region = %region,
            zone = %zone,
            endpoint = %base_url,
            "PowerVS session ready"
        );

        Ok(Self {
            authenticator,
            http: http.with_debug(debug),
            base_url,
            region,
            zone,
            user_account,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn user_account(&self) -> &str {
        &self.user_account
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// CRN header value scoping a call to one service instance
    pub fn crn(&self, cloud_instance_id: &str) -> String {
        format!(
            "crn:v1:bluemix:public:power-iaas:{}:a/{}:{}::",
            self.zone, self.user_account, cloud_instance_id
        )
    }

    fn url(&self, method: &'static str, cloud_instance_id: &str, path: &str) -> Result<Url, ProviderApiError> {
        self.base_url
            .join(&format!(
                "pcloud/v1/cloud-instances/{}/{}",
                urlencoding::encode(cloud_instance_id),
                path
            ))
            .map_err(|e| ProviderApiError::new(method, path, format!("Invalid request URL: {e}")))
    }

    async fn token(&self, method: &'static str, path: &str) -> Result<String, ProviderApiError> {
        self.authenticator
            .token()
            .await
            .map_err(|e| ProviderApiError::new(method, path, format!("{e:#}")))
    }
}

#[async_trait]
impl PowerTransport for Session {
    async fn get(&self, cloud_instance_id: &str, path: &str) -> Result<Value, ProviderApiError> {
        let url = self.url("GET", cloud_instance_id, path)?;
        let token = self.token("GET", path).await?;

        let request = self
            .http
            .inner()
            .get(url)
            .bearer_auth(token)
            .header("CRN", self.crn(cloud_instance_id));

        let body = self.http.execute("GET", path, request).await?;
        Ok(body.unwrap_or(Value::Null))
    }

    async fn delete(&self, cloud_instance_id: &str, path: &str) -> Result<(), ProviderApiError> {
        let url = self.url("DELETE", cloud_instance_id, path)?;
        let token = self.token("DELETE", path).await?;

        let request = self
            .http
            .inner()
            .delete(url)
            .bearer_auth(token)
            .header("CRN", self.crn(cloud_instance_id));

        self.http.execute("DELETE", path, request).await?;
        Ok(())
    }
}
