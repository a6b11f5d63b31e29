//! Networks and their ports
//!
//! Ports have no global address; every port call carries the ID of the
//! network that owns it. Deleting a network does not touch its ports.

use async_trait::async_trait;
use std::sync::Arc;

use super::{ChildResourceClient, NetworkPorts, Networks, ResourceClient, ResourceKind, Scope};
use crate::error::ProviderApiError;
use crate::ibmcloud::PowerTransport;

/// Lists and deletes networks and ports in one service instance
pub struct NetworkClient<T> {
    scope: Scope<T>,
}

impl<T: PowerTransport> NetworkClient<T> {
    pub fn new(session: Arc<T>, cloud_instance_id: impl Into<String>) -> Self {
        Self {
            scope: Scope::new(session, cloud_instance_id),
        }
    }

    pub fn cloud_instance_id(&self) -> &str {
        self.scope.cloud_instance_id()
    }
}

#[async_trait]
impl<T: PowerTransport + 'static> ResourceClient for NetworkClient<T> {
    type Listing = Networks;

    async fn list(&self) -> Result<Networks, ProviderApiError> {
        self.scope.list(ResourceKind::Network, None).await
    }

    async fn delete(&self, id: &str) -> Result<(), ProviderApiError> {
        self.scope.delete(ResourceKind::Network, None, id).await
    }
}

#[async_trait]
impl<T: PowerTransport + 'static> ChildResourceClient for NetworkClient<T> {
    type ChildListing = NetworkPorts;

    async fn list_children(&self, network_id: &str) -> Result<NetworkPorts, ProviderApiError> {
        self.scope.list(ResourceKind::Port, Some(network_id)).await
    }

    async fn delete_child(&self, network_id: &str, port_id: &str) -> Result<(), ProviderApiError> {
        self.scope
            .delete(ResourceKind::Port, Some(network_id), port_id)
            .await
    }
}
