//! The cancellable collection loop.
//!
//! Lifecycle: the connection is acquired by the caller before the loop
//! starts, the first cycle runs immediately, and subsequent cycles run one
//! poll interval after the previous cycle completes, so at most one cycle is
//! ever in flight. Cancellation is observed only at wait points: before
//! starting a cycle and during the inter-tick sleep, never mid-cycle. There
//! is no per-cycle timeout, so a hung hypervisor call can stall shutdown.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::collector::run_cycle;
use crate::hypervisor::Hypervisor;
use crate::sink::EventSink;

/// Owns the connection, the timer, and the run loop.
pub struct Scheduler<S: EventSink> {
    hypervisor: Box<dyn Hypervisor>,
    sink: S,
    interval: Duration,
    shutdown: CancellationToken,
}

impl<S: EventSink> Scheduler<S> {
    pub fn new(
        hypervisor: Box<dyn Hypervisor>,
        sink: S,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            hypervisor,
            sink,
            interval,
            shutdown,
        }
    }

    /// Run cycles until cancellation, then drain and release the connection.
    pub async fn run(mut self) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Collection loop started"
        );

        loop {
            if self.shutdown.is_cancelled() {
                info!("Shutdown requested before cycle start");
                break;
            }

            let stats = run_cycle(self.hypervisor.as_ref(), &mut self.sink);
            debug!(
                domains = stats.domains,
                emitted = stats.emitted,
                "Waiting {}s before next cycle",
                self.interval.as_secs()
            );

            if self
                .shutdown
                .run_until_cancelled(tokio::time::sleep(self.interval))
                .await
                .is_none()
            {
                info!("Shutdown requested during poll wait");
                break;
            }
        }

        // Dropping self releases the connection handle.
        info!("Collection loop stopped, releasing hypervisor connection");
    }
}
