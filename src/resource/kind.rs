//! PowerVS resource kinds
//!
//! The closed set of resource kinds the janitor reclaims and how each is
//! addressed under a service instance.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Virtual server instance
    Instance,
    /// Virtual network
    Network,
    /// Network port, addressed within its network
    Port,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Instance,
        ResourceKind::Network,
        ResourceKind::Port,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Instance => "pvm-instance",
            ResourceKind::Network => "network",
            ResourceKind::Port => "port",
        }
    }

    /// Path segment of the collection holding this kind
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::Instance => "pvm-instances",
            ResourceKind::Network => "networks",
            ResourceKind::Port => "ports",
        }
    }

    /// Kind whose ID scopes this one
    pub fn parent(self) -> Option<ResourceKind> {
        match self {
            ResourceKind::Port => Some(ResourceKind::Network),
            ResourceKind::Instance | ResourceKind::Network => None,
        }
    }

    /// Collection path relative to the service instance
    ///
    /// `parent_id` is required for kinds with a parent and ignored otherwise.
    pub fn list_path(self, parent_id: Option<&str>) -> String {
        match (self.parent(), parent_id) {
            (Some(parent), Some(parent_id)) => format!(
                "{}/{}/{}",
                parent.collection(),
                urlencoding::encode(parent_id),
                self.collection()
            ),
            (Some(_), None) => {
                debug_assert!(false, "{} requires a parent ID", self);
                self.collection().to_string()
            }
            (None, _) => self.collection().to_string(),
        }
    }

    /// Item path relative to the service instance
    pub fn item_path(self, parent_id: Option<&str>, id: &str) -> String {
        format!("{}/{}", self.list_path(parent_id), urlencoding::encode(id))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
