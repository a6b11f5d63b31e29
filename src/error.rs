//! Error types
//!
//! `ClientError` is what client construction returns; every bootstrap
//! failure is labeled with the stage that produced it and keeps the cause
//! as its source. `ProviderApiError` is what list/delete calls return.

use std::fmt;
use thiserror::Error;

use crate::pool::MetadataError;

/// Ordered stages of client bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapStage {
    ResourceData,
    Authenticator,
    ServiceIdClient,
    Account,
    Session,
}

impl BootstrapStage {
    pub fn as_str(self) -> &'static str {
        match self {
            BootstrapStage::ResourceData => "resource data",
            BootstrapStage::Authenticator => "authenticator",
            BootstrapStage::ServiceIdClient => "serviceID client",
            BootstrapStage::Account => "account",
            BootstrapStage::Session => "session",
        }
    }
}

impl fmt::Display for BootstrapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure while building a [`crate::client::PowerVsClient`]
#[derive(Debug, Error)]
pub enum ClientError {
    /// The lease record is missing or malformed
    #[error("failed to get the resource data")]
    Metadata(#[from] MetadataError),

    /// The credential provider could not produce an authenticator
    #[error("failed to get the authenticator")]
    Auth(#[source] anyhow::Error),

    /// The lease API key could not be turned into a service-ID client
    #[error("failed to create serviceID client")]
    ServiceIdClient(#[source] anyhow::Error),

    /// The service-ID lookup did not yield an account
    #[error("failed to get the account")]
    AccountResolution(#[source] anyhow::Error),

    /// The provider rejected the session options
    #[error("failed to create a new session")]
    Session(#[source] anyhow::Error),

    /// Endpoints or HTTP settings could not be turned into a backend
    #[error("invalid client configuration")]
    Config(#[source] anyhow::Error),

    #[error(transparent)]
    ProviderApi(#[from] ProviderApiError),
}

impl ClientError {
    /// Bootstrap stage that failed, if this is a construction error
    pub fn stage(&self) -> Option<BootstrapStage> {
        match self {
            ClientError::Metadata(_) => Some(BootstrapStage::ResourceData),
            ClientError::Auth(_) => Some(BootstrapStage::Authenticator),
            ClientError::ServiceIdClient(_) => Some(BootstrapStage::ServiceIdClient),
            ClientError::AccountResolution(_) => Some(BootstrapStage::Account),
            ClientError::Session(_) => Some(BootstrapStage::Session),
            ClientError::Config(_) | ClientError::ProviderApi(_) => None,
        }
    }

    /// Both service-ID stages count as account resolution
    pub fn is_account_resolution(&self) -> bool {
        matches!(
            self,
            ClientError::ServiceIdClient(_) | ClientError::AccountResolution(_)
        )
    }
}

/// A provider list/delete call failed
///
/// Carries the HTTP status when the provider answered, `None` when the
/// request never got a response (connect failure, token exchange failure).
#[derive(Debug, Clone, Error)]
#[error("{method} {path} failed{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
pub struct ProviderApiError {
    pub method: &'static str,
    pub path: String,
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderApiError {
    pub fn new(method: &'static str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}
