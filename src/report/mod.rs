//! Result sinks: where a finished [`Topology`] goes.
//!
//! The core only produces values; a [`SnapshotSink`] decides how they leave
//! the process. Provided sinks:
//! - [`JsonSink`]: pretty-printed JSON
//! - [`TextSink`]: human-readable diagnostic dump
//! - [`ChannelSink`]: typed [`SnapshotEvent`]s on a tokio channel

mod channel;
mod json;
mod text;

pub use channel::{ChannelSink, SnapshotEvent};
pub use json::JsonSink;
pub use text::TextSink;

use std::io;

use thiserror::Error;

use crate::network::Topology;

/// Errors raised while handing a snapshot to a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing the report failed.
    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),

    /// Serializing the snapshot failed.
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The receiving side of the event channel is gone.
    #[error("Snapshot receiver dropped")]
    ChannelClosed,
}

/// Receives finished snapshots.
pub trait SnapshotSink {
    /// Hands one snapshot to the sink.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the snapshot cannot be delivered.
    fn deliver(&mut self, topology: &Topology) -> Result<(), SinkError>;
}

impl<S: SnapshotSink + ?Sized> SnapshotSink for Box<S> {
    fn deliver(&mut self, topology: &Topology) -> Result<(), SinkError> {
        self.as_mut().deliver(topology)
    }
}
