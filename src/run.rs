//! Application execution logic.
//!
//! A snapshot is collected on a blocking task and published through a
//! [`ChannelSink`]; the async side receives the event and renders it.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use netsnap::config::{OutputFormat, ValidatedConfig};
use netsnap::device::{DeviceIdSource, DeviceMac, FixedDeviceId, MachineIdSource};
use netsnap::network::filter::FilterChain;
use netsnap::network::platform::PlatformProvider;
use netsnap::network::{NetworkInfoProvider, SnapshotBuilder, SnapshotError, Topology};
use netsnap::report::{ChannelSink, JsonSink, SinkError, SnapshotEvent, SnapshotSink, TextSink};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The platform could not describe its network configuration.
    #[error("Snapshot failed: {0}")]
    Snapshot(#[source] Arc<SnapshotError>),

    /// The collector finished without publishing anything.
    #[error("Snapshot collector exited without a result")]
    CollectorGone,

    /// The blocking collector task panicked or was cancelled.
    #[error("Snapshot task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Failed to create the report file.
    #[error("Failed to create report file '{}': {source}", path.display())]
    OutputCreate {
        /// Report path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failed to render the report.
    #[error(transparent)]
    Report(#[from] SinkError),
}

/// Collects one snapshot from the platform and writes the report.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be collected or the report
/// cannot be written.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let topology = collect(PlatformProvider::default(), config.filter).await?;
    tracing::info!("Collected {} adapter(s)", topology.len());

    match config.output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| RunError::OutputCreate {
                path: path.clone(),
                source: e,
            })?;
            write_report(&topology, config.format, BufWriter::new(file))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => write_report(&topology, config.format, io::stdout().lock())?,
    }

    Ok(())
}

/// Builds a snapshot on a blocking task and waits for its event.
async fn collect<P>(provider: P, filter: FilterChain) -> Result<Topology, RunError>
where
    P: NetworkInfoProvider + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let builder = SnapshotBuilder::new(provider).with_filter(filter);

    let task = tokio::task::spawn_blocking(move || publish(&builder, ChannelSink::new(tx)));

    let event = rx.recv().await;
    task.await??;

    match event {
        Some(SnapshotEvent::Collected(topology)) => Ok(topology),
        Some(SnapshotEvent::Failed(error)) => Err(RunError::Snapshot(error)),
        None => Err(RunError::CollectorGone),
    }
}

fn publish<P: NetworkInfoProvider>(
    builder: &SnapshotBuilder<P>,
    mut sink: ChannelSink,
) -> Result<(), SinkError> {
    match builder.build() {
        Ok(topology) => sink.deliver(&topology),
        Err(e) => sink.report_failure(e),
    }
}

/// Renders `topology` in the requested format.
fn write_report<W: Write>(
    topology: &Topology,
    format: OutputFormat,
    writer: W,
) -> Result<(), SinkError> {
    match format {
        OutputFormat::Json => JsonSink::new(writer).deliver(topology),
        OutputFormat::Text => TextSink::new(writer).deliver(topology),
    }
}

/// Derives the pseudo-MAC for the `mac` command.
///
/// A configured identifier wins; otherwise the machine id files are read.
#[must_use]
pub fn device_mac(device_id: Option<&str>) -> DeviceMac {
    match device_id {
        Some(id) => mac_from(&FixedDeviceId(id.to_string())),
        None => mac_from(&MachineIdSource::default()),
    }
}

fn mac_from(source: &dyn DeviceIdSource) -> DeviceMac {
    let id = source.device_id();
    if id.is_none() {
        tracing::warn!("No device identifier available; using zero MAC");
    }
    DeviceMac::derive(id.as_deref())
}
