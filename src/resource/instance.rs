//! Virtual server instances

use async_trait::async_trait;
use std::sync::Arc;

use super::{PvmInstances, ResourceClient, ResourceKind, Scope};
use crate::error::ProviderApiError;
use crate::ibmcloud::PowerTransport;

/// Lists and deletes PVM instances in one service instance
pub struct InstanceClient<T> {
    scope: Scope<T>,
}

impl<T: PowerTransport> InstanceClient<T> {
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
impl<T: PowerTransport + 'static> ResourceClient for InstanceClient<T> {
    type Listing = PvmInstances;

    async fn list(&self) -> Result<PvmInstances, ProviderApiError> {
        self.scope.list(ResourceKind::Instance, None).await
    }

    async fn delete(&self, id: &str) -> Result<(), ProviderApiError> {
        self.scope.delete(ResourceKind::Instance, None, id).await
    }
}
