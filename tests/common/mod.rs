//! Shared test doubles
//!
//! `FakePower` is an in-memory PowerVS service instance; `FakeBackend`
//! records which bootstrap collaborators were called.

#![allow(dead_code)]

use async_trait::async_trait;
use powervs_janitor::ibmcloud::http::HttpClient;
use powervs_janitor::ibmcloud::{
    ApiKey, Authenticator, CloudBackend, PowerTransport, ServiceIdClient, SessionOptions,
};
use powervs_janitor::pool::{Resource, API_KEY_KEY, REGION_KEY, SERVICE_INSTANCE_ID_KEY, ZONE_KEY};
use powervs_janitor::ProviderApiError;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

pub const WORKSPACE_ID: &str = "ws-1";
pub const LEASE_KEY: &str = "lease-api-key";

/// A complete lease record for `WORKSPACE_ID`
pub fn lease() -> Resource {
    lease_with(&[
        (SERVICE_INSTANCE_ID_KEY, WORKSPACE_ID),
        (REGION_KEY, "dal"),
        (ZONE_KEY, "dal12"),
        (API_KEY_KEY, LEASE_KEY),
    ])
}

pub fn lease_with(pairs: &[(&str, &str)]) -> Resource {
    Resource {
        name: "powervs-lease-1".to_string(),
        kind: "powervs-service".to_string(),
        state: "dirty".to_string(),
        user_data: Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ),
        ..Default::default()
    }
}

/// Contents of a fake service instance
#[derive(Debug, Clone, Default)]
pub struct FakeState {
    pub instances: Vec<String>,
    pub networks: Vec<String>,
    pub ports: BTreeMap<String, Vec<String>>,
}

impl FakeState {
    pub fn seeded() -> Self {
        let mut ports = BTreeMap::new();
        ports.insert("net-a".to_string(), vec!["port-1".to_string(), "port-2".to_string()]);
        ports.insert("net-b".to_string(), vec!["port-3".to_string()]);

        Self {
            instances: vec!["vm-1".to_string(), "vm-2".to_string(), "vm-3".to_string()],
            networks: vec!["net-a".to_string(), "net-b".to_string()],
            ports,
        }
    }
}

/// In-memory provider double
pub struct FakePower {
    cloud_instance_id: String,
    state: Mutex<FakeState>,
    /// Every DELETE path, in call order
    deletes: Mutex<Vec<String>>,
    /// Paths whose DELETE fails with a 409
    pub stuck: Mutex<Vec<String>>,
}

impl FakePower {
    pub fn new(cloud_instance_id: &str, state: FakeState) -> Self {
        Self {
            cloud_instance_id: cloud_instance_id.to_string(),
            state: Mutex::new(state),
            deletes: Mutex::new(Vec::new()),
            stuck: Mutex::new(Vec::new()),
        }
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    fn not_found(method: &'static str, path: &str) -> ProviderApiError {
        ProviderApiError::new(method, path, "resource not found").with_status(404)
    }
}

#[async_trait]
impl PowerTransport for FakePower {
    async fn get(&self, cloud_instance_id: &str, path: &str) -> Result<Value, ProviderApiError> {
        if cloud_instance_id != self.cloud_instance_id {
            return Err(ProviderApiError::new("GET", path, "wrong workspace").with_status(403));
        }
        let state = self.state.lock().unwrap();
        let segments: Vec<&str> = path.split('/').collect();

        match segments.as_slice() {
            ["pvm-instances"] => Ok(json!({
                "pvmInstances": state.instances.iter()
                    .map(|id| json!({"pvmInstanceID": id, "serverName": format!("server-{id}"), "status": "ACTIVE"}))
                    .collect::<Vec<_>>()
            })),
            ["networks"] => Ok(json!({
                "networks": state.networks.iter()
                    .map(|id| json!({"networkID": id, "name": format!("name-{id}"), "type": "vlan"}))
                    .collect::<Vec<_>>()
            })),
            ["networks", network, "ports"] => match state.ports.get(*network) {
                Some(ports) => Ok(json!({
                    "ports": ports.iter()
                        .map(|id| json!({"portID": id, "ipAddress": "10.0.0.1", "status": "DOWN"}))
                        .collect::<Vec<_>>()
                })),
                None if state.networks.iter().any(|n| n.as_str() == *network) => Ok(json!({"ports": []})),
                None => Err(Self::not_found("GET", path)),
            },
            _ => Err(Self::not_found("GET", path)),
        }
    }

    async fn delete(&self, cloud_instance_id: &str, path: &str) -> Result<(), ProviderApiError> {
        if cloud_instance_id != self.cloud_instance_id {
            return Err(ProviderApiError::new("DELETE", path, "wrong workspace").with_status(403));
        }
        self.deletes.lock().unwrap().push(path.to_string());
        if self.stuck.lock().unwrap().iter().any(|p| p == path) {
            return Err(ProviderApiError::new("DELETE", path, "resource is busy").with_status(409));
        }

        let mut state = self.state.lock().unwrap();
        let segments: Vec<&str> = path.split('/').collect();

        let removed = match segments.as_slice() {
            ["pvm-instances", id] => remove(&mut state.instances, id),
            ["networks", id] => remove(&mut state.networks, id),
            ["networks", network, "ports", id] => state
                .ports
                .get_mut(*network)
                .map(|ports| remove(ports, id))
                .unwrap_or(false),
            _ => false,
        };

        if removed {
            Ok(())
        } else {
            Err(Self::not_found("DELETE", path))
        }
    }
}

fn remove(items: &mut Vec<String>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item != id);
    items.len() != before
}

/// Bootstrap collaborators with call counters
pub struct FakeBackend {
    pub identity_endpoint: Url,
    pub authenticator: Option<Authenticator>,
    pub fail_session: bool,
    pub state: FakeState,
    pub authenticator_calls: AtomicUsize,
    pub service_id_calls: AtomicUsize,
    pub session_calls: AtomicUsize,
    pub last_session: Mutex<Option<SessionOptions>>,
}

impl FakeBackend {
    /// Backend resolving accounts against `identity_endpoint`
    pub fn new(identity_endpoint: &str) -> Self {
        Self {
            identity_endpoint: Url::parse(&format!("{}/", identity_endpoint.trim_end_matches('/')))
                .unwrap(),
            authenticator: Some(Authenticator::bearer("test-token")),
            fail_session: false,
            state: FakeState::seeded(),
            authenticator_calls: AtomicUsize::new(0),
            service_id_calls: AtomicUsize::new(0),
            session_calls: AtomicUsize::new(0),
            last_session: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.authenticator_calls.load(Ordering::SeqCst),
            self.service_id_calls.load(Ordering::SeqCst),
            self.session_calls.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl CloudBackend for FakeBackend {
    type Session = FakePower;

    async fn authenticator(&self) -> anyhow::Result<Authenticator> {
        self.authenticator_calls.fetch_add(1, Ordering::SeqCst);
        self.authenticator
            .clone()
            .ok_or_else(|| anyhow::anyhow!("credential store unavailable"))
    }

    fn service_id_client(
        &self,
        authenticator: &Authenticator,
        key: ApiKey,
    ) -> anyhow::Result<ServiceIdClient> {
        self.service_id_calls.fetch_add(1, Ordering::SeqCst);
        ServiceIdClient::new(
            authenticator.clone(),
            key,
            &self.identity_endpoint,
            HttpClient::new(Duration::from_secs(5))?,
        )
    }

    async fn new_session(&self, options: SessionOptions) -> anyhow::Result<FakePower> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_session.lock().unwrap() = Some(options);
        if self.fail_session {
            anyhow::bail!("zone dal99 is not available in region dal");
        }
        Ok(FakePower::new(WORKSPACE_ID, self.state.clone()))
    }
}
