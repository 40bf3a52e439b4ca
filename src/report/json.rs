//! JSON sink.

use std::io::Write;

use super::{SinkError, SnapshotSink};
use crate::network::Topology;

/// Writes each snapshot as a pretty-printed JSON array of adapters.
///
/// Keys use the camelCase names of the data model (`displayName`,
/// `isHostRoute`, ...); absent values are `null`.
#[derive(Debug)]
pub struct JsonSink<W> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SnapshotSink for JsonSink<W> {
    fn deliver(&mut self, topology: &Topology) -> Result<(), SinkError> {
        serde_json::to_writer_pretty(&mut self.writer, topology)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
