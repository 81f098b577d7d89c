//! Narrow capability traits over the hypervisor connection.
//!
//! The collector only ever needs two operations from a hypervisor: list the
//! currently defined domains, and read a handful of attributes from each.
//! Keeping the seam this narrow isolates the collection logic from any
//! particular client library and lets tests substitute a fake.

use std::sync::Arc;

use crate::config::ConnectionConfig;
use crate::error::{HypervisorError, StartupError};

#[cfg(feature = "libvirt")]
pub mod libvirt;

/// Detailed domain info read in a single call.
#[derive(Debug, Clone, Copy)]
pub struct DomainInfo {
    /// Raw lifecycle state code as reported by the hypervisor.
    pub state_code: u32,
    /// Number of virtual CPUs.
    pub vcpus: u32,
    /// Memory in KB.
    pub memory_kb: u64,
}

/// One domain as exposed by an open connection.
///
/// Each attribute read is independent so that a single failed read never
/// poisons the others.
pub trait Domain {
    /// Display name of the domain.
    fn name(&self) -> Result<String, HypervisorError>;

    /// Canonical UUID string.
    fn uuid(&self) -> Result<String, HypervisorError>;

    /// Hypervisor-assigned numeric ID; `None` when the domain is not running.
    fn id(&self) -> Option<u32>;

    /// State code, vcpu count, and memory.
    fn info(&self) -> Result<DomainInfo, HypervisorError>;
}

/// An open hypervisor connection.
///
/// Acquired once at startup in poll mode and reused across cycles; the
/// underlying handle is released when the value is dropped.
pub trait Hypervisor {
    /// Enumerate all domains, running and defined-but-stopped alike.
    fn list_domains(&self) -> Result<Vec<Box<dyn Domain>>, HypervisorError>;
}

/// Factory for hypervisor connections.
///
/// Poll mode connects once and holds the connection for the process
/// lifetime; serve mode opens and closes one connection per request.
pub trait Connector: Send + Sync {
    fn connect(&self) -> Result<Box<dyn Hypervisor>, HypervisorError>;
}

/// Build the connector for the configured hypervisor.
#[cfg(feature = "libvirt")]
pub fn connector(config: &ConnectionConfig) -> Result<Arc<dyn Connector>, StartupError> {
    Ok(Arc::new(libvirt::LibvirtConnector::new(config.uri.clone())))
}

/// Build the connector for the configured hypervisor.
///
/// Without the `libvirt` feature there is no backend to connect to.
#[cfg(not(feature = "libvirt"))]
pub fn connector(_config: &ConnectionConfig) -> Result<Arc<dyn Connector>, StartupError> {
    crate::error::LibvirtDisabledSnafu.fail()
}
