//! Libvirt-backed hypervisor connector.
//!
//! Thin adapter from the `virt` crate onto the capability traits. All calls
//! here are blocking libvirt RPCs; callers on the async runtime are expected
//! to run them on the blocking pool or accept the stall.

use virt::connect::Connect;
use virt::domain::Domain as VirtDomain;

use super::{Connector, Domain, DomainInfo, Hypervisor};
use crate::error::HypervisorError;

/// Connector that opens libvirt connections to a fixed URI.
pub struct LibvirtConnector {
    uri: String,
}

impl LibvirtConnector {
    pub fn new(uri: String) -> Self {
        Self { uri }
    }
}

impl Connector for LibvirtConnector {
    fn connect(&self) -> Result<Box<dyn Hypervisor>, HypervisorError> {
        let conn = Connect::open(Some(self.uri.as_str())).map_err(|e| HypervisorError::Connect {
            uri: self.uri.clone(),
            message: e.to_string(),
        })?;
        Ok(Box::new(LibvirtHypervisor { conn }))
    }
}

/// An open libvirt connection.
pub struct LibvirtHypervisor {
    conn: Connect,
}

impl Hypervisor for LibvirtHypervisor {
    fn list_domains(&self) -> Result<Vec<Box<dyn Domain>>, HypervisorError> {
        // Flags 0: no state filter, stopped domains included.
        let domains = self
            .conn
            .list_all_domains(0)
            .map_err(|e| HypervisorError::ListDomains {
                message: e.to_string(),
            })?;
        Ok(domains
            .into_iter()
            .map(|d| Box::new(LibvirtDomain(d)) as Box<dyn Domain>)
            .collect())
    }
}

impl Drop for LibvirtHypervisor {
    fn drop(&mut self) {
        if let Err(e) = self.conn.close() {
            tracing::warn!(error = %e, "Error closing libvirt connection");
        }
    }
}

struct LibvirtDomain(VirtDomain);

impl LibvirtDomain {
    fn attribute_error(attribute: &'static str, e: virt::error::Error) -> HypervisorError {
        HypervisorError::Attribute {
            attribute,
            message: e.to_string(),
        }
    }
}

impl Domain for LibvirtDomain {
    fn name(&self) -> Result<String, HypervisorError> {
        self.0
            .get_name()
            .map_err(|e| Self::attribute_error("name", e))
    }

    fn uuid(&self) -> Result<String, HypervisorError> {
        self.0
            .get_uuid_string()
            .map_err(|e| Self::attribute_error("uuid", e))
    }

    fn id(&self) -> Option<u32> {
        self.0.get_id()
    }

    fn info(&self) -> Result<DomainInfo, HypervisorError> {
        let info = self
            .0
            .get_info()
            .map_err(|e| Self::attribute_error("info", e))?;
        Ok(DomainInfo {
            state_code: info.state as u32,
            vcpus: info.nr_virt_cpu,
            memory_kb: info.memory,
        })
    }
}
