//! Cleanup pass
//!
//! Reclaims everything in one lease's service instance: instances first,
//! then each network after its ports. Failures are logged and skipped so one
//! stuck resource does not block the rest of the pass.

use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

use crate::client::PowerVsClient;
use crate::error::ProviderApiError;
use crate::ibmcloud::PowerTransport;
use crate::resource::ResourceKind;

/// Result of a single resource cleanup operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupResult {
    Deleted,
    Failed,
    /// Dry run
    Skipped,
}

/// Per-kind tallies of one cleanup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindTally {
    pub deleted: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    tallies: BTreeMap<&'static str, KindTally>,
    /// Listings that could not be fetched
    pub list_failures: usize,
}

impl CleanupReport {
    fn record(&mut self, kind: ResourceKind, result: CleanupResult) {
        let tally = self.tallies.entry(kind.as_str()).or_default();
        match result {
            CleanupResult::Deleted => tally.deleted += 1,
            CleanupResult::Failed => tally.failed += 1,
            CleanupResult::Skipped => tally.skipped += 1,
        }
    }

    pub fn tally(&self, kind: ResourceKind) -> KindTally {
        self.tallies.get(kind.as_str()).copied().unwrap_or_default()
    }

    /// True when nothing failed, listings included
    pub fn is_clean(&self) -> bool {
        self.list_failures == 0 && self.tallies.values().all(|t| t.failed == 0)
    }
}

impl fmt::Display for CleanupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in ResourceKind::ALL {
            let t = self.tally(kind);
            writeln!(
                f,
                "{:<14} deleted={} failed={} skipped={}",
                kind.as_str(),
                t.deleted,
                t.failed,
                t.skipped
            )?;
        }
        write!(f, "{:<14} {}", "list failures", self.list_failures)
    }
}

fn outcome(
    kind: ResourceKind,
    id: &str,
    result: Result<(), ProviderApiError>,
) -> CleanupResult {
    match result {
        Ok(()) => {
            info!(kind = %kind, id = %id, "Deleted");
            CleanupResult::Deleted
        }
        Err(e) => {
            warn!(kind = %kind, id = %id, error = %e, "Cleanup failed");
            CleanupResult::Failed
        }
    }
}

/// Delete every instance, port and network reachable through `client`
pub async fn clean<S: PowerTransport + 'static>(
    client: &PowerVsClient<S>,
    dry_run: bool,
) -> CleanupReport {
    let mut report = CleanupReport::default();

    match client.get_instances().await {
        Ok(instances) => {
            for id in instances.ids() {
                let result = if dry_run {
                    info!(kind = "pvm-instance", id = %id, "Would delete");
                    CleanupResult::Skipped
                } else {
                    outcome(ResourceKind::Instance, id, client.delete_instance(id).await)
                };
                report.record(ResourceKind::Instance, result);
            }
        }
        Err(e) => {
            warn!(error = %e, "Failed to list instances");
            report.list_failures += 1;
        }
    }

    let networks = match client.get_networks().await {
        Ok(networks) => networks,
        Err(e) => {
            warn!(error = %e, "Failed to list networks");
            report.list_failures += 1;
            return report;
        }
    };

    for network_id in networks.ids() {
        match client.get_ports(network_id).await {
            Ok(ports) => {
                for port_id in ports.ids() {
                    let result = if dry_run {
                        info!(kind = "port", network = %network_id, id = %port_id, "Would delete");
                        CleanupResult::Skipped
                    } else {
                        outcome(
                            ResourceKind::Port,
                            port_id,
                            client.delete_port(network_id, port_id).await,
                        )
                    };
                    report.record(ResourceKind::Port, result);
                }
            }
            Err(e) => {
                warn!(network = %network_id, error = %e, "Failed to list ports");
                report.list_failures += 1;
            }
        }

        let result = if dry_run {
            info!(kind = "network", id = %network_id, "Would delete");
            CleanupResult::Skipped
        } else {
            outcome(
                ResourceKind::Network,
                network_id,
                client.delete_network(network_id).await,
            )
        };
        report.record(ResourceKind::Network, result);
    }

    report
}
