//! Error types for the collector.
//!
//! The taxonomy mirrors the propagation policy: only `StartupError` may
//! terminate the process. Everything below the cycle boundary is absorbed
//! and logged where it occurs.

use snafu::prelude::*;

// ============ Hypervisor Errors ============

/// Errors raised by the hypervisor connection.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HypervisorError {
    /// Connection to the hypervisor could not be established.
    #[snafu(display("Failed to connect to hypervisor at {uri}: {message}"))]
    Connect { uri: String, message: String },

    /// Domain enumeration failed (e.g., lost connection).
    #[snafu(display("Failed to enumerate domains: {message}"))]
    ListDomains { message: String },

    /// A single attribute of a single domain could not be read.
    #[snafu(display("Failed to read domain {attribute}: {message}"))]
    Attribute {
        attribute: &'static str,
        message: String,
    },
}

// ============ Collector Errors ============

/// Errors fatal to one collection cycle (never to the process).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CollectorError {
    /// A per-request connection could not be opened (serve mode).
    #[snafu(display("Hypervisor connection failed: {source}"))]
    Connection { source: HypervisorError },

    /// Domain listing failed for this cycle.
    #[snafu(display("Domain enumeration failed: {source}"))]
    Enumeration { source: HypervisorError },
}

// ============ Sink Errors ============

/// Errors writing a single event to the output sink.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// The event could not be encoded as JSON.
    #[snafu(display("Failed to serialize event: {source}"))]
    Serialize { source: serde_json::Error },

    /// The serialized event could not be written.
    #[snafu(display("Failed to write event: {source}"))]
    Io { source: std::io::Error },
}

// ============ Config Errors ============

/// Errors that can occur during configuration parsing and validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[snafu(display("Failed to read configuration file {}: {source}", path.display()))]
    ReadFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[snafu(display("Failed to parse YAML: {source}"))]
    YamlParse { source: serde_yaml::Error },

    /// Environment variable interpolation failed.
    #[snafu(display("Environment variable interpolation failed:\n{message}"))]
    EnvInterpolation { message: String },

    /// Collection interval must be nonzero.
    #[snafu(display("interval_secs must be greater than zero"))]
    ZeroInterval,

    /// Connection URI must not be empty.
    #[snafu(display("connection.uri cannot be empty"))]
    EmptyConnectionUri,
}

// ============ Metrics Errors ============

/// Errors that can occur during metrics initialization.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MetricsError {
    /// Failed to initialize the Prometheus recorder.
    #[snafu(display("Failed to initialize Prometheus recorder: {source}"))]
    PrometheusInit {
        source: metrics_exporter_prometheus::BuildError,
    },
}

// ============ Startup Errors ============

/// Errors that terminate the process before the first cycle.
///
/// The initial hypervisor connection is the only unrecoverable runtime
/// failure; everything after it is absorbed at the cycle boundary.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StartupError {
    /// The startup hypervisor connection could not be established.
    #[snafu(display("Hypervisor unavailable: {source}"))]
    HypervisorUnavailable { source: HypervisorError },

    /// Failed to parse a listen address.
    #[snafu(display("Invalid listen address '{address}': {source}"))]
    AddressParse {
        address: String,
        source: std::net::AddrParseError,
    },

    /// Failed to initialize metrics.
    #[snafu(display("Failed to initialize metrics: {source}"))]
    Metrics { source: MetricsError },

    /// Failed to bind the HTTP listener (serve mode).
    #[snafu(display("Failed to bind {address}: {source}"))]
    Bind {
        address: String,
        source: std::io::Error,
    },

    /// The HTTP server terminated with an error (serve mode).
    #[snafu(display("Server error: {source}"))]
    Serve { source: std::io::Error },

    /// The binary was built without a hypervisor backend.
    #[snafu(display("Built without libvirt support; rebuild with --features libvirt"))]
    LibvirtDisabled,
}
