//! Internal events for collector metrics emission.
//!
//! Each event struct represents a measurable occurrence in the collection
//! loop. Events implement the `InternalEvent` trait which emits the
//! corresponding Prometheus metric.

use metrics::{counter, gauge, histogram};
use std::time::Duration;
use tracing::trace;

/// Trait for internal events that can be emitted as metrics.
pub trait InternalEvent {
    /// Emit this event as a metric.
    fn emit(self);
}

/// Event emitted when a collection cycle completes.
pub struct CycleCompleted {
    /// Domains that produced a snapshot this cycle.
    pub domains: u64,
    /// Events written to the sink this cycle.
    pub emitted: u64,
}

impl InternalEvent for CycleCompleted {
    fn emit(self) {
        trace!(domains = self.domains, emitted = self.emitted, "Cycle completed");
        counter!("flurry_cycles_total", "result" => "completed").increment(1);
        counter!("flurry_events_emitted_total").increment(self.emitted);
        gauge!("flurry_domains_observed").set(self.domains as f64);
    }
}

/// Event emitted when domain enumeration fails and a cycle is skipped.
pub struct CycleFailed;

impl InternalEvent for CycleFailed {
    fn emit(self) {
        trace!("Cycle failed");
        counter!("flurry_cycles_total", "result" => "failed").increment(1);
    }
}

/// Event emitted when events are dropped on serialization or write failure.
pub struct EventsDropped {
    pub count: u64,
}

impl InternalEvent for EventsDropped {
    fn emit(self) {
        trace!(count = self.count, "Events dropped");
        counter!("flurry_events_dropped_total").increment(self.count);
    }
}

/// Event recording the wall-clock duration of one cycle.
pub struct CycleDuration {
    pub duration: Duration,
}

impl InternalEvent for CycleDuration {
    fn emit(self) {
        histogram!("flurry_cycle_duration_seconds").record(self.duration.as_secs_f64());
    }
}
