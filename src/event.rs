//! ECS-compatible event schema.
//!
//! One event is built per domain snapshot per cycle. The field layout is a
//! stable contract with the ingestion agent; renaming or removing a field is
//! a breaking change for downstream consumers.

use serde::Serialize;

use crate::collector::{DomainSnapshot, DomainState};

/// ECS schema version stamped on every event.
pub const ECS_VERSION: &str = "8.11.0";

/// One emitted event for one domain.
#[derive(Debug, Clone, Serialize)]
pub struct VmEvent {
    /// Cycle-level RFC3339 UTC timestamp, byte-identical across all events
    /// of one cycle.
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    pub ecs: EcsFields,
    pub libvirt: LibvirtFields,
}

#[derive(Debug, Clone, Serialize)]
pub struct EcsFields {
    pub version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LibvirtFields {
    pub domain: DomainFields,
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainFields {
    pub name: String,
    pub uuid: String,
    pub state: DomainState,
    /// Hypervisor-assigned ID; 0 when the domain is not running.
    pub id: u32,
    pub vcpu: u32,
    pub memory: MemoryFields,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryFields {
    pub kb: u64,
}

impl VmEvent {
    /// Build the event for one snapshot. Pure and deterministic given its
    /// inputs; the timestamp is stamped by the caller, once per cycle.
    pub fn from_snapshot(snapshot: &DomainSnapshot, timestamp: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            ecs: EcsFields {
                version: ECS_VERSION,
            },
            libvirt: LibvirtFields {
                domain: DomainFields {
                    name: snapshot.name.clone(),
                    uuid: snapshot.uuid.clone(),
                    state: snapshot.state,
                    id: snapshot.id.unwrap_or(0),
                    vcpu: snapshot.vcpus,
                    memory: MemoryFields {
                        kb: snapshot.memory_kb,
                    },
                },
            },
        }
    }

    /// Domain name, for diagnostics.
    pub fn domain_name(&self) -> &str {
        &self.libvirt.domain.name
    }
}
