//! PowerVS janitor
//!
//! Reclaims the virtual server instances, networks and network ports left
//! behind in PowerVS workspaces leased from a shared resource pool.
//!
//! # Module Structure
//!
//! - [`pool`] - Lease records and the PowerVS data inside them
//! - [`ibmcloud`] - Authentication, account lookup and the scoped session
//! - [`resource`] - Per-kind list/delete clients and listing models
//! - [`client`] - [`client::PowerVsClient`], the facade over one lease
//! - [`cleanup`] - The reclaim pass driving the facade
//! - [`config`] - Endpoint and credential settings
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```ignore
//! use powervs_janitor::client::{CleanupOptions, PowerVsClient};
//! use powervs_janitor::config::Config;
//!
//! async fn example(resource: powervs_janitor::pool::Resource) -> anyhow::Result<()> {
//!     let options = CleanupOptions::new(resource);
//!     let client = PowerVsClient::connect(&options, &Config::load()).await?;
//!     for id in client.get_instances().await?.ids() {
//!         client.delete_instance(id).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod cleanup;
pub mod client;
pub mod config;
pub mod error;
pub mod ibmcloud;
pub mod pool;
pub mod resource;

pub use client::{CleanupOptions, PowerVsClient};
pub use error::{BootstrapStage, ClientError, ProviderApiError};
