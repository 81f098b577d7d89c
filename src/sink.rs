//! Event output sinks.
//!
//! Events own the data channel (stdout at the process boundary); diagnostics
//! go through `tracing` to stderr and must never interleave with event
//! output.

use std::io::Write;

use snafu::prelude::*;

use crate::error::{IoSnafu, SerializeSnafu, SinkError};
use crate::event::VmEvent;

/// Destination for serialized events.
pub trait EventSink {
    /// Write one event. A failure affects only this event; callers drop it
    /// and continue with siblings.
    fn emit(&mut self, event: &VmEvent) -> Result<(), SinkError>;
}

/// Newline-delimited JSON sink over any writer.
///
/// Each event is serialized to a complete line before any byte is written,
/// so a serialization failure never leaves a truncated record on the stream.
pub struct NdjsonSink<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for NdjsonSink<W> {
    fn emit(&mut self, event: &VmEvent) -> Result<(), SinkError> {
        let line = serde_json::to_string(event).context(SerializeSnafu)?;
        self.writer.write_all(line.as_bytes()).context(IoSnafu)?;
        self.writer.write_all(b"\n").context(IoSnafu)?;
        // Flush per event so the shipping agent sees complete lines promptly.
        self.writer.flush().context(IoSnafu)
    }
}
