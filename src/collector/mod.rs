//! Domain snapshot reading with per-domain failure isolation.
//!
//! - `state` - Lifecycle state code to label mapping
//! - `cycle` - The collect-and-emit cycle run once per tick

mod cycle;
mod state;

pub use cycle::{CycleStats, collect_events, cycle_timestamp, run_cycle};
pub use state::DomainState;

use snafu::prelude::*;
use tracing::{debug, warn};

use crate::error::{CollectorError, EnumerationSnafu};
use crate::hypervisor::Hypervisor;

/// Point-in-time attribute values for one domain, read during one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSnapshot {
    /// Display name; empty when the name read failed.
    pub name: String,
    /// Lowercase UUID string; empty when the uuid read failed.
    pub uuid: String,
    /// Hypervisor-assigned ID; `None` when the domain is not running.
    pub id: Option<u32>,
    /// Normalized lifecycle state.
    pub state: DomainState,
    /// Virtual CPU count.
    pub vcpus: u32,
    /// Memory in KB.
    pub memory_kb: u64,
}

/// Read a snapshot of every domain known to the connection.
///
/// Failure policy:
/// - a failed `list_domains` is fatal to the cycle and propagates;
/// - a failed detail read drops that one domain with a logged diagnostic,
///   siblings are unaffected;
/// - a failed name or uuid read leaves the field at its zero value and the
///   snapshot is still produced.
///
/// Snapshots preserve the enumeration order reported by the hypervisor.
pub fn read_snapshots(hypervisor: &dyn Hypervisor) -> Result<Vec<DomainSnapshot>, CollectorError> {
    let domains = hypervisor.list_domains().context(EnumerationSnafu)?;
    debug!(count = domains.len(), "Enumerated domains");

    let mut snapshots = Vec::with_capacity(domains.len());
    for domain in &domains {
        let name = match domain.name() {
            Ok(name) => name,
            Err(e) => {
                warn!(error = %e, "Domain name unavailable, leaving empty");
                String::new()
            }
        };
        let uuid = match domain.uuid() {
            Ok(uuid) => uuid.to_lowercase(),
            Err(e) => {
                warn!(domain = %name, error = %e, "Domain uuid unavailable, leaving empty");
                String::new()
            }
        };
        let info = match domain.info() {
            Ok(info) => info,
            Err(e) => {
                warn!(domain = %name, error = %e, "Detail read failed, skipping domain");
                continue;
            }
        };
        snapshots.push(DomainSnapshot {
            name,
            uuid,
            id: domain.id(),
            state: DomainState::from_code(info.state_code),
            vcpus: info.vcpus,
            memory_kb: info.memory_kb,
        });
    }
    Ok(snapshots)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fake hypervisor implementations shared by collector tests.

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::HypervisorError;
    use crate::hypervisor::{Domain, DomainInfo, Hypervisor};

    #[derive(Clone)]
    pub struct FakeDomain {
        pub name: Result<String, String>,
        pub uuid: Result<String, String>,
        pub id: Option<u32>,
        pub info: Result<DomainInfo, String>,
    }

    impl FakeDomain {
        pub fn running(name: &str, uuid: &str, id: u32) -> Self {
            Self {
                name: Ok(name.to_string()),
                uuid: Ok(uuid.to_string()),
                id: Some(id),
                info: Ok(DomainInfo {
                    state_code: 1,
                    vcpus: 2,
                    memory_kb: 2_097_152,
                }),
            }
        }

        pub fn shutoff(name: &str, uuid: &str) -> Self {
            Self {
                name: Ok(name.to_string()),
                uuid: Ok(uuid.to_string()),
                id: None,
                info: Ok(DomainInfo {
                    state_code: 5,
                    vcpus: 1,
                    memory_kb: 1_048_576,
                }),
            }
        }

        pub fn broken_detail(name: &str, uuid: &str) -> Self {
            Self {
                name: Ok(name.to_string()),
                uuid: Ok(uuid.to_string()),
                id: None,
                info: Err("injected detail failure".to_string()),
            }
        }
    }

    impl Domain for FakeDomain {
        fn name(&self) -> Result<String, HypervisorError> {
            self.name
                .clone()
                .map_err(|message| HypervisorError::Attribute {
                    attribute: "name",
                    message,
                })
        }

        fn uuid(&self) -> Result<String, HypervisorError> {
            self.uuid
                .clone()
                .map_err(|message| HypervisorError::Attribute {
                    attribute: "uuid",
                    message,
                })
        }

        fn id(&self) -> Option<u32> {
            self.id
        }

        fn info(&self) -> Result<DomainInfo, HypervisorError> {
            self.info
                .clone()
                .map_err(|message| HypervisorError::Attribute {
                    attribute: "info",
                    message,
                })
        }
    }

    pub struct FakeHypervisor {
        pub domains: Vec<FakeDomain>,
        pub fail_listing: bool,
        pub listings: Arc<AtomicUsize>,
    }

    impl FakeHypervisor {
        pub fn with_domains(domains: Vec<FakeDomain>) -> Self {
            Self {
                domains,
                fail_listing: false,
                listings: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn failing() -> Self {
            Self {
                domains: Vec::new(),
                fail_listing: true,
                listings: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Hypervisor for FakeHypervisor {
        fn list_domains(&self) -> Result<Vec<Box<dyn Domain>>, HypervisorError> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            if self.fail_listing {
                return Err(HypervisorError::ListDomains {
                    message: "connection reset".to_string(),
                });
            }
            Ok(self
                .domains
                .iter()
                .cloned()
                .map(|d| Box::new(d) as Box<dyn Domain>)
                .collect())
        }
    }
}
