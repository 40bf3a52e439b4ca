//! Event-channel sink.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use super::{SinkError, SnapshotSink};
use crate::network::{SnapshotError, Topology};

/// A message emitted towards the surrounding application.
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
    /// A snapshot was built.
    Collected(Topology),
    /// Building the snapshot failed.
    Failed(Arc<SnapshotError>),
}

/// Publishes snapshots as [`SnapshotEvent`]s on an unbounded tokio channel.
///
/// The receiver owns subscription and delivery; the sink never blocks.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<SnapshotEvent>,
}

impl ChannelSink {
    #[must_use]
    pub const fn new(sender: UnboundedSender<SnapshotEvent>) -> Self {
        Self { sender }
    }

    /// Publishes a snapshot failure.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::ChannelClosed`] if the receiver is gone.
    pub fn report_failure(&self, error: SnapshotError) -> Result<(), SinkError> {
        self.send(SnapshotEvent::Failed(Arc::new(error)))
    }

    fn send(&self, event: SnapshotEvent) -> Result<(), SinkError> {
        self.sender.send(event).map_err(|_| SinkError::ChannelClosed)
    }
}

impl SnapshotSink for ChannelSink {
    fn deliver(&mut self, topology: &Topology) -> Result<(), SinkError> {
        self.send(SnapshotEvent::Collected(topology.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Adapter, ProviderError, RawInterface, stage};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn delivered_snapshot_arrives_as_collected_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = ChannelSink::new(tx);
        let topology = Topology::new(vec![Adapter::aggregate(RawInterface::new("eth0", vec![]), None)]);

        sink.deliver(&topology).unwrap();

        match rx.recv().await {
            Some(SnapshotEvent::Collected(received)) => assert_eq!(received, topology),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_keeps_stage_and_provider_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = ChannelSink::new(tx);
        let error = SnapshotError::ProviderUnavailable {
            stage: stage::LINK_PROPERTIES,
            source: ProviderError::PermissionDenied {
                context: "netlink route dump".to_string(),
            },
        };

        sink.report_failure(error).unwrap();

        match rx.recv().await {
            Some(SnapshotEvent::Failed(error)) => match error.as_ref() {
                SnapshotError::ProviderUnavailable {
                    stage: failed_stage,
                    source: ProviderError::PermissionDenied { context },
                } => {
                    assert_eq!(*failed_stage, stage::LINK_PROPERTIES);
                    assert!(context.contains("route dump"));
                }
                other => panic!("unexpected error: {other:?}"),
            },
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn closed_receiver_is_an_error() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut sink = ChannelSink::new(tx);

        let result = sink.deliver(&Topology::default());

        assert!(matches!(result, Err(SinkError::ChannelClosed)));
    }
}
