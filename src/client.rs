//! PowerVS Client
//!
//! Entry point the janitor uses to enumerate and reclaim the resources of
//! one pool lease. Construction turns the lease record into an authenticated
//! session; the list/delete calls delegate to the per-kind clients.

use std::sync::Arc;
use tracing::Instrument;

use crate::config::Config;
use crate::error::{ClientError, ProviderApiError};
use crate::ibmcloud::{ApiKey, CloudBackend, IbmCloud, PowerTransport, Session, SessionOptions};
use crate::pool::{get_resource_data, Resource};
use crate::resource::{
    ChildResourceClient, InstanceClient, NetworkClient, NetworkPorts, Networks, PvmInstances,
    ResourceClient,
};

/// Settings for one cleanup pass over one lease
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    pub resource: Resource,
    /// Log provider requests and responses
    pub debug: bool,
    /// Report what would be deleted without deleting
    pub dry_run: bool,
}

impl CleanupOptions {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            debug: false,
            dry_run: false,
        }
    }
}

/// Client for the resources of one PowerVS service instance
pub struct PowerVsClient<S = Session> {
    session: Arc<S>,
    instance: InstanceClient<S>,
    network: NetworkClient<S>,
    resource_name: String,
}

impl PowerVsClient<Session> {
    /// Build a client against IBM Cloud using `config` for endpoints and credentials
    ///
    /// The lease is checked before the configuration, so a malformed lease
    /// is reported as such whatever the endpoints are.
    pub async fn connect(options: &CleanupOptions, config: &Config) -> Result<Self, ClientError> {
        get_resource_data(&options.resource)?;
        let backend = IbmCloud::from_config(config).map_err(ClientError::Config)?;
        Self::new(options, &backend).await
    }
}

impl<S: PowerTransport + 'static> PowerVsClient<S> {
    /// Run the bootstrap stages in order and build the per-kind clients
    ///
    /// Fails with the first stage error; nothing is returned on failure.
    pub async fn new<B>(options: &CleanupOptions, backend: &B) -> Result<Self, ClientError>
    where
        B: CloudBackend<Session = S>,
    {
        let span = tracing::info_span!("powervs_client", resource = %options.resource.name);
        Self::bootstrap(options, backend).instrument(span).await
    }

    async fn bootstrap<B>(options: &CleanupOptions, backend: &B) -> Result<Self, ClientError>
    where
        B: CloudBackend<Session = S>,
    {
        let data = get_resource_data(&options.resource)?;
        tracing::debug!(
            service_instance_id = %data.service_instance_id,
            region = %data.region,
            zone = %data.zone,
            "Resource data loaded"
        );

        let key = ApiKey::new(options.resource.name.clone(), data.api_key);

        let authenticator = backend.authenticator().await.map_err(ClientError::Auth)?;
        tracing::debug!(kind = authenticator.kind(), "Authenticator ready");

        let service_ids = backend
            .service_id_client(&authenticator, key)
            .map_err(ClientError::ServiceIdClient)?;

        let account = service_ids
            .get_account()
            .await
            .map_err(ClientError::AccountResolution)?;
        // The lease key is not needed past this point.
        drop(service_ids);
        tracing::debug!("Account resolved");

        let session = backend
            .new_session(SessionOptions {
                authenticator,
                region: data.region,
                zone: data.zone,
                user_account: account,
                debug: options.debug,
                endpoint: None,
            })
            .await
            .map_err(ClientError::Session)?;

        tracing::info!("successfully created PowerVS client");

        Ok(Self::from_session(
            session,
            data.service_instance_id,
            options.resource.name.clone(),
        ))
    }

    /// Wrap an existing session scoped to `cloud_instance_id`
    pub fn from_session(
        session: S,
        cloud_instance_id: impl Into<String>,
        resource_name: impl Into<String>,
    ) -> Self {
        let session = Arc::new(session);
        let cloud_instance_id = cloud_instance_id.into();

        Self {
            instance: InstanceClient::new(Arc::clone(&session), cloud_instance_id.clone()),
            network: NetworkClient::new(Arc::clone(&session), cloud_instance_id),
            session,
            resource_name: resource_name.into(),
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn cloud_instance_id(&self) -> &str {
        self.instance.cloud_instance_id()
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Returns the virtual server instances in the service instance
    pub async fn get_instances(&self) -> Result<PvmInstances, ProviderApiError> {
        self.instance.list().await
    }

    /// Deletes a virtual server instance
    pub async fn delete_instance(&self, id: &str) -> Result<(), ProviderApiError> {
        self.instance.delete(id).await
    }

    /// Returns the networks in the service instance
    pub async fn get_networks(&self) -> Result<Networks, ProviderApiError> {
        self.network.list().await
    }

    /// Deletes a network; its ports are left alone
    pub async fn delete_network(&self, id: &str) -> Result<(), ProviderApiError> {
        self.network.delete(id).await
    }

    /// Returns the ports of a network
    pub async fn get_ports(&self, network_id: &str) -> Result<NetworkPorts, ProviderApiError> {
        self.network.list_children(network_id).await
    }

    /// Deletes one port of a network
    pub async fn delete_port(&self, network_id: &str, port_id: &str) -> Result<(), ProviderApiError> {
        self.network.delete_child(network_id, port_id).await
    }
}
