//! Flurry CLI: libvirt domain telemetry collector.

use std::process::ExitCode;

use clap::Parser;
use snafu::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::info;

use flurry::error::{AddressParseSnafu, HypervisorUnavailableSnafu, MetricsSnafu, StartupError};
use flurry::{
    CliArgs, Config, Mode, NdjsonSink, Scheduler, hypervisor, init_tracing, metrics, server,
    shutdown_signal,
};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = CliArgs::parse();
    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("flurry failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), StartupError> {
    let connector = hypervisor::connector(&config.connection)?;

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown.cancel();
        });
    }

    match config.mode {
        Mode::Poll => {
            let metrics_addr = config.metrics.address.parse().context(AddressParseSnafu {
                address: config.metrics.address.clone(),
            })?;
            metrics::init(metrics_addr).context(MetricsSnafu)?;

            // The startup connection is the only unrecoverable runtime
            // failure; it is held for the process lifetime.
            let hv = connector.connect().context(HypervisorUnavailableSnafu)?;
            info!(uri = %config.connection.uri, "Connected to hypervisor");

            let sink = NdjsonSink::new(std::io::stdout());
            Scheduler::new(hv, sink, config.interval(), shutdown)
                .run()
                .await;
            Ok(())
        }
        Mode::Serve => {
            let addr = config.server.address.parse().context(AddressParseSnafu {
                address: config.server.address.clone(),
            })?;
            server::run(addr, connector, shutdown).await
        }
    }
}
