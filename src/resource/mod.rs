//! Resource abstraction layer
//!
//! Per-kind clients that normalize list/delete against a PowerVS service
//! instance.
//!
//! # Architecture
//!
//! - [`kind`] - The closed set of resource kinds and their paths
//! - [`models`] - Listing payloads returned by the provider
//! - [`instance`] - Virtual server instances
//! - [`network`] - Networks and the ports inside them
//!
//! Every kind supports [`ResourceClient`]; kinds that own children (networks
//! own ports) also implement [`ChildResourceClient`].

pub mod instance;
pub mod kind;
pub mod models;
pub mod network;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::error::ProviderApiError;
use crate::ibmcloud::PowerTransport;

pub use instance::InstanceClient;
pub use kind::ResourceKind;
pub use models::{HasId, Network, NetworkPort, NetworkPorts, Networks, PvmInstance, PvmInstances};
pub use network::NetworkClient;

/// List/delete for one resource kind
#[async_trait]
pub trait ResourceClient: Send + Sync {
    type Listing: Send;

    async fn list(&self) -> Result<Self::Listing, ProviderApiError>;

    async fn delete(&self, id: &str) -> Result<(), ProviderApiError>;
}

/// List/delete for resources addressed within a parent
#[async_trait]
pub trait ChildResourceClient: ResourceClient {
    type ChildListing: Send;

    async fn list_children(&self, parent_id: &str) -> Result<Self::ChildListing, ProviderApiError>;

    async fn delete_child(&self, parent_id: &str, child_id: &str) -> Result<(), ProviderApiError>;
}

/// Session plus the service instance every call is scoped to
pub(crate) struct Scope<T> {
    session: Arc<T>,
    cloud_instance_id: String,
}

impl<T> Clone for Scope<T> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            cloud_instance_id: self.cloud_instance_id.clone(),
        }
    }
}

impl<T: PowerTransport> Scope<T> {
    pub(crate) fn new(session: Arc<T>, cloud_instance_id: impl Into<String>) -> Self {
        Self {
            session,
            cloud_instance_id: cloud_instance_id.into(),
        }
    }

    pub(crate) fn cloud_instance_id(&self) -> &str {
        &self.cloud_instance_id
    }

    pub(crate) async fn list<L>(
        &self,
        kind: ResourceKind,
        parent_id: Option<&str>,
    ) -> Result<L, ProviderApiError>
    where
        L: DeserializeOwned + Default,
    {
        let path = kind.list_path(parent_id);
        let value = self.session.get(&self.cloud_instance_id, &path).await?;
        decode(&path, value)
    }

    pub(crate) async fn delete(
        &self,
        kind: ResourceKind,
        parent_id: Option<&str>,
        id: &str,
    ) -> Result<(), ProviderApiError> {
        let path = kind.item_path(parent_id, id);
        tracing::debug!(kind = %kind, id = %id, "Deleting");
        self.session.delete(&self.cloud_instance_id, &path).await
    }
}

/// Decode a listing; an empty reply is an empty listing
fn decode<L: DeserializeOwned + Default>(path: &str, value: Value) -> Result<L, ProviderApiError> {
    if value.is_null() {
        return Ok(L::default());
    }
    serde_json::from_value(value).map_err(|e| {
        ProviderApiError::new("GET", path, format!("Failed to decode listing: {e}"))
    })
}
