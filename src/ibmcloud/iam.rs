//! Service-ID lookups against the IAM Identity API

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use url::Url;

use super::auth::{Authenticator, Secret};
use super::http::HttpClient;

/// A lease API key and the service ID it belongs to
#[derive(Debug)]
pub struct ApiKey {
    service_id_name: String,
    value: Secret,
}

impl ApiKey {
    pub fn new(service_id_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            service_id_name: service_id_name.into(),
            value: Secret::new(value),
        }
    }

    pub fn service_id_name(&self) -> &str {
        &self.service_id_name
    }
}

#[derive(Deserialize)]
struct ApiKeyDetails {
    #[serde(default)]
    account_id: Option<String>,
}

/// Resolves the account that owns a lease API key
#[derive(Debug)]
pub struct ServiceIdClient {
    authenticator: Authenticator,
    key: ApiKey,
    details_url: Url,
    http: HttpClient,
}

impl ServiceIdClient {
    pub fn new(
        authenticator: Authenticator,
        key: ApiKey,
        identity_endpoint: &Url,
        http: HttpClient,
    ) -> Result<Self> {
        authenticator.validate()?;
        if key.value.expose().is_empty() {
            bail!("API key for service ID {:?} is empty", key.service_id_name);
        }

        let details_url = identity_endpoint
            .join("v1/apikeys/details")
            .context("Invalid IAM identity endpoint")?;

        Ok(Self {
            authenticator,
            key,
            details_url,
            http,
        })
    }

    /// Look up the account ID owning the API key
    pub async fn get_account(&self) -> Result<String> {
        let token = self.authenticator.token().await?;

        let request = self
            .http
            .inner()
            .get(self.details_url.clone())
            .bearer_auth(token)
            .header("IAM-ApiKey", self.key.value.expose());

        let body = self
            .http
            .execute("GET", self.details_url.path(), request)
            .await
            .with_context(|| {
                format!("Failed to get API key details for {:?}", self.key.service_id_name())
            })?
            .context("IAM returned empty API key details")?;

        let details: ApiKeyDetails =
            serde_json::from_value(body).context("Failed to parse API key details")?;

        match details.account_id {
            Some(account) if !account.trim().is_empty() => Ok(account),
            _ => bail!(
                "API key details for {:?} carry no account ID",
                self.key.service_id_name
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn identity() -> Url {
        Url::parse("https://iam.cloud.ibm.com/").unwrap()
    }

    fn http() -> HttpClient {
        HttpClient::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = ServiceIdClient::new(
            Authenticator::bearer("token"),
            ApiKey::new("lease-1", ""),
            &identity(),
            http(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("lease-1"));
    }

    #[test]
    fn test_invalid_authenticator_rejected() {
        assert!(ServiceIdClient::new(
            Authenticator::bearer(""),
            ApiKey::new("lease-1", "key"),
            &identity(),
            http(),
        )
        .is_err());
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("lease-1", "hunter2");
        assert_eq!(key.service_id_name(), "lease-1");
        let debug = format!("{:?}", key);
        assert!(debug.contains("lease-1"));
        assert!(!debug.contains("hunter2"));
    }
}
