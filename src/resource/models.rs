//! PowerVS listing payloads

use serde::{Deserialize, Serialize};

/// Anything with a provider ID
pub trait HasId {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PvmInstance {
    #[serde(rename = "pvmInstanceID")]
    pub pvm_instance_id: String,
    #[serde(default)]
    pub server_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
}

impl HasId for PvmInstance {
    fn id(&self) -> &str {
        &self.pvm_instance_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PvmInstances {
    #[serde(rename = "pvmInstances", default)]
    pub pvm_instances: Vec<PvmInstance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    #[serde(rename = "networkID")]
    pub network_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "vlanID", default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u32>,
}

impl HasId for Network {
    fn id(&self) -> &str {
        &self.network_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Networks {
    #[serde(default)]
    pub networks: Vec<Network>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPort {
    #[serde(rename = "portID")]
    pub port_id: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub mac_address: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: String,
}

impl HasId for NetworkPort {
    fn id(&self) -> &str {
        &self.port_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPorts {
    #[serde(default)]
    pub ports: Vec<NetworkPort>,
}

impl PvmInstances {
    pub fn ids(&self) -> Vec<&str> {
        self.pvm_instances.iter().map(HasId::id).collect()
    }
}

impl Networks {
    pub fn ids(&self) -> Vec<&str> {
        self.networks.iter().map(HasId::id).collect()
    }
}

impl NetworkPorts {
    pub fn ids(&self) -> Vec<&str> {
        self.ports.iter().map(HasId::id).collect()
    }
}
