//! One collection cycle: read snapshots, build events, emit each.
//!
//! The cycle is the error absorption boundary. Everything that can go wrong
//! below it is logged and reflected in [`CycleStats`]; nothing propagates to
//! the scheduler.

use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, error, warn};

use super::read_snapshots;
use crate::error::CollectorError;
use crate::event::VmEvent;
use crate::hypervisor::Hypervisor;
use crate::metrics::emit;
use crate::metrics::events::{CycleCompleted, CycleDuration, CycleFailed, EventsDropped};
use crate::sink::EventSink;

/// Outcome of one collection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleStats {
    /// Domains that produced a snapshot this cycle.
    pub domains: usize,
    /// Events successfully written to the sink.
    pub emitted: usize,
    /// Events dropped on serialization or write failure.
    pub dropped: usize,
    /// True when enumeration itself failed and the cycle was skipped.
    pub failed: bool,
}

/// The RFC3339 UTC timestamp shared by every event of one cycle.
pub fn cycle_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Build the events for the current snapshot set, stamped with `timestamp`.
///
/// Used by both the timer loop and the request-driven server path.
pub fn collect_events(
    hypervisor: &dyn Hypervisor,
    timestamp: &str,
) -> Result<Vec<VmEvent>, CollectorError> {
    let snapshots = read_snapshots(hypervisor)?;
    Ok(snapshots
        .iter()
        .map(|snapshot| VmEvent::from_snapshot(snapshot, timestamp))
        .collect())
}

/// Run one cycle against an open connection, writing events to `sink`.
///
/// Never fails: an enumeration failure skips this cycle (the next tick
/// retries on the same connection), and a failure writing one event drops
/// only that event.
pub fn run_cycle(hypervisor: &dyn Hypervisor, sink: &mut dyn EventSink) -> CycleStats {
    let started = Instant::now();
    let timestamp = cycle_timestamp();

    let events = match collect_events(hypervisor, &timestamp) {
        Ok(events) => events,
        Err(e) => {
            error!(error = %e, "Collection cycle failed, retrying at next tick");
            emit!(CycleFailed);
            emit!(CycleDuration {
                duration: started.elapsed(),
            });
            return CycleStats {
                failed: true,
                ..CycleStats::default()
            };
        }
    };

    let mut emitted = 0;
    let mut dropped = 0;
    for event in &events {
        match sink.emit(event) {
            Ok(()) => emitted += 1,
            Err(e) => {
                warn!(domain = %event.domain_name(), error = %e, "Dropping event");
                dropped += 1;
            }
        }
    }

    emit!(CycleCompleted {
        domains: events.len() as u64,
        emitted: emitted as u64,
    });
    if dropped > 0 {
        emit!(EventsDropped {
            count: dropped as u64,
        });
    }
    emit!(CycleDuration {
        duration: started.elapsed(),
    });
    debug!(domains = events.len(), emitted, dropped, "Cycle complete");

    CycleStats {
        domains: events.len(),
        emitted,
        dropped,
        failed: false,
    }
}
