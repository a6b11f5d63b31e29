//! Pool lease records
//!
//! A leased resource as handed out by the resource pool, and the PowerVS
//! specific data carried in its user data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// User data key holding the PowerVS workspace (service instance) ID
pub const SERVICE_INSTANCE_ID_KEY: &str = "service-instance-id";
/// User data key holding the workspace region
pub const REGION_KEY: &str = "region";
/// User data key holding the workspace zone
pub const ZONE_KEY: &str = "zone";
/// User data key holding the lease API key
pub const API_KEY_KEY: &str = "api-key";

/// Free-form key/value data attached to a lease
pub type UserData = HashMap<String, String>;

/// One resource checked out from the pool, pending cleanup
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub owner: String,
    #[serde(rename = "userdata", default)]
    pub user_data: Option<UserData>,
}

impl Resource {
    /// Load a lease record from a JSON file
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read resource file {}", path.display()))?;
        serde_json::from_str(&content).context("Failed to parse resource JSON")
    }
}

// User data carries the lease API key; only the keys are shown.
impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Option<Vec<&String>> = self.user_data.as_ref().map(|d| d.keys().collect());
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("type", &self.kind)
            .field("state", &self.state)
            .field("owner", &self.owner)
            .field("user_data_keys", &keys)
            .finish()
    }
}

/// Why a lease record could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("resource {0:?} has no user data")]
    MissingUserData(String),

    #[error("resource {resource:?} user data is missing {key:?}")]
    MissingField { resource: String, key: &'static str },

    #[error("resource {resource:?} user data has an empty {key:?}")]
    EmptyField { resource: String, key: &'static str },
}

/// PowerVS connection data extracted from a lease
#[derive(Clone)]
pub struct PowerVsData {
    pub service_instance_id: String,
    pub region: String,
    pub zone: String,
    pub api_key: String,
}

impl fmt::Debug for PowerVsData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerVsData")
            .field("service_instance_id", &self.service_instance_id)
            .field("region", &self.region)
            .field("zone", &self.zone)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Extract the PowerVS connection data from a lease record
pub fn get_resource_data(resource: &Resource) -> Result<PowerVsData, MetadataError> {
    let Some(user_data) = resource.user_data.as_ref() else {
        return Err(MetadataError::MissingUserData(resource.name.clone()));
    };

    let field = |key: &'static str| -> Result<String, MetadataError> {
        match user_data.get(key) {
            None => Err(MetadataError::MissingField {
                resource: resource.name.clone(),
                key,
            }),
            Some(value) if value.trim().is_empty() => Err(MetadataError::EmptyField {
                resource: resource.name.clone(),
                key,
            }),
            Some(value) => Ok(value.trim().to_string()),
        }
    };

    Ok(PowerVsData {
        service_instance_id: field(SERVICE_INSTANCE_ID_KEY)?,
        region: field(REGION_KEY)?,
        zone: field(ZONE_KEY)?,
        api_key: field(API_KEY_KEY)?,
    })
}
