//! Single-writer persistence queue.
//!
//! Snapshots are written one at a time in the order the actor enqueued them,
//! so the record left in storage always matches the latest enqueued
//! collection once the queue is drained.

use tokio::sync::mpsc;

use crate::bus::Bus;
use crate::error::CoreError;
use crate::event::{CartEvent, PersistFailedPayload};
use crate::storage::SharedStorage;
use crate::store::protocol::WriteCommand;

pub(crate) struct SnapshotWriter {
    storage: SharedStorage,
    key: String,
    bus: Bus,
    write_rx: mpsc::UnboundedReceiver<WriteCommand>,
    /// First failure since the last flush.
    pending_error: Option<CoreError>,
}

pub(crate) fn spawn_snapshot_writer(
    storage: SharedStorage,
    key: String,
    bus: Bus,
) -> mpsc::UnboundedSender<WriteCommand> {
    let (write_tx, write_rx) = mpsc::unbounded_channel();
    let writer = SnapshotWriter {
        storage,
        key,
        bus,
        write_rx,
        pending_error: None,
    };
    tokio::spawn(async move {
        writer.run().await;
    });
    write_tx
}

impl SnapshotWriter {
    async fn run(mut self) {
        while let Some(command) = self.write_rx.recv().await {
            match command {
                WriteCommand::Persist { revision, snapshot } => {
                    self.persist(revision, &snapshot).await;
                }
                WriteCommand::Flush { reply } => {
                    let result = match self.pending_error.take() {
                        Some(error) => Err(error),
                        None => Ok(()),
                    };
                    let _ = reply.send(result);
                }
            }
        }
        tracing::debug!("cart snapshot writer for {} stopped", self.key);
    }

    async fn persist(&mut self, revision: u64, snapshot: &str) {
        match self.storage.write(&self.key, snapshot).await {
            Ok(()) => {
                tracing::debug!(revision, "persisted cart snapshot");
            }
            Err(error) => {
                tracing::warn!(revision, "failed to persist cart snapshot: {}", error);
                let _ = self
                    .bus
                    .publish(CartEvent::PersistFailed(PersistFailedPayload {
                        revision,
                        error: error.to_string(),
                    }));
                if self.pending_error.is_none() {
                    self.pending_error = Some(error);
                }
            }
        }
    }
}
