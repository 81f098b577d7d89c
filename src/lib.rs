//! Flurry: libvirt domain telemetry collector.
//!
//! This crate polls a hypervisor for the set of currently defined domains
//! and emits one ECS-compatible JSON event per domain per collection cycle:
//!
//! - `hypervisor/` - Narrow capability traits over the hypervisor connection,
//!   with a libvirt-backed implementation behind the `libvirt` feature
//! - `collector/` - Domain state mapping, snapshot reading, and the
//!   collection cycle with per-domain failure isolation
//! - `event` - The stable ECS event schema stamped once per cycle
//! - `sink` - Newline-delimited JSON event output
//! - `scheduler` - The cancellable run loop (immediate first cycle, fixed
//!   interval, graceful drain)
//! - `server` - Alternate request-driven delivery over HTTP
//! - `metrics` - Prometheus metrics infrastructure
//! - `config` - YAML configuration with environment variable interpolation

pub mod collector;
pub mod config;
pub mod error;
pub mod event;
pub mod hypervisor;
pub mod metrics;
pub mod scheduler;
pub mod server;
pub mod signal;
pub mod sink;
pub mod tracing;

// Re-export commonly used items
pub use collector::{CycleStats, DomainSnapshot, DomainState, read_snapshots, run_cycle};
pub use config::{CliArgs, Config, Mode};
pub use error::{CollectorError, ConfigError, HypervisorError, SinkError, StartupError};
pub use event::VmEvent;
pub use hypervisor::{Connector, Domain, DomainInfo, Hypervisor};
pub use scheduler::Scheduler;
pub use signal::shutdown_signal;
pub use sink::{EventSink, NdjsonSink};
pub use tracing::init_tracing;
