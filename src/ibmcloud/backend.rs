//! Collaborators used to bootstrap a PowerVS client
//!
//! [`CloudBackend`] bundles the credential provider, the service-ID client
//! factory and the session factory. [`IbmCloud`] is the real one.

use anyhow::{Context, Result};
use async_trait::async_trait;
use url::Url;

use super::auth::{get_authenticator, Authenticator};
use super::http::HttpClient;
use super::iam::{ApiKey, ServiceIdClient};
use super::session::{PowerTransport, Session, SessionOptions};
use crate::config::Config;

#[async_trait]
pub trait CloudBackend: Send + Sync {
    type Session: PowerTransport + 'static;

    /// Authenticator for the janitor's own identity
    async fn authenticator(&self) -> Result<Authenticator>;

    /// Client able to resolve the account owning `key`
    fn service_id_client(&self, authenticator: &Authenticator, key: ApiKey) -> Result<ServiceIdClient>;

    /// Session scoped to the given region, zone and account
    async fn new_session(&self, options: SessionOptions) -> Result<Self::Session>;
}

/// IBM Cloud endpoints and credentials from configuration
#[derive(Debug, Clone)]
pub struct IbmCloud {
    http: HttpClient,
    iam_endpoint: Url,
    power_endpoint: Option<Url>,
    api_key_env: String,
}

impl IbmCloud {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = HttpClient::new(config.effective_timeout())?;

        Ok(Self {
            http,
            iam_endpoint: config
                .effective_iam_endpoint()
                .context("Invalid IAM endpoint")?,
            power_endpoint: config
                .effective_power_endpoint()
                .context("Invalid PowerVS endpoint")?,
            api_key_env: config.effective_api_key_env(),
        })
    }
}

#[async_trait]
impl CloudBackend for IbmCloud {
    type Session = Session;

    async fn authenticator(&self) -> Result<Authenticator> {
        get_authenticator(&self.api_key_env, &self.iam_endpoint, &self.http)
    }

    fn service_id_client(&self, authenticator: &Authenticator, key: ApiKey) -> Result<ServiceIdClient> {
        ServiceIdClient::new(authenticator.clone(), key, &self.iam_endpoint, self.http.clone())
    }

    async fn new_session(&self, mut options: SessionOptions) -> Result<Session> {
        if options.endpoint.is_none() {
            options.endpoint = self.power_endpoint.clone();
        }
        Session::new(options, self.http.clone())
    }
}
