use tokio::sync::{mpsc, oneshot, watch};
use tracing::Instrument;

use crate::bus::Bus;
use crate::error::{CoreError, CoreResult};
use crate::event::{CartErrorPayload, CartEvent, CartLoadedPayload, ProductsChangedPayload};
use crate::product::CartCollection;
use crate::storage::{SharedStorage, Storage};
use crate::store::protocol::{CartCommand, LoadState, WriteCommand};

/// Owns the cart contents. Every mutation goes through this task.
pub(crate) struct CartStoreActor {
    key: String,
    storage: SharedStorage,
    bus: Bus,
    products: CartCollection,
    revision: u64,
    command_rx: mpsc::UnboundedReceiver<CartCommand>,
    write_tx: mpsc::UnboundedSender<WriteCommand>,
    status_tx: watch::Sender<LoadState>,
}

impl CartStoreActor {
    pub(crate) fn new(
        key: String,
        storage: SharedStorage,
        bus: Bus,
        command_rx: mpsc::UnboundedReceiver<CartCommand>,
        write_tx: mpsc::UnboundedSender<WriteCommand>,
        status_tx: watch::Sender<LoadState>,
    ) -> Self {
        Self {
            key,
            storage,
            bus,
            products: CartCollection::new(),
            revision: 0,
            command_rx,
            write_tx,
            status_tx,
        }
    }

    pub(crate) async fn run(mut self) {
        let span = tracing::info_span!("cart_load", key = %self.key);
        self.load().instrument(span).await;

        while let Some(command) = self.command_rx.recv().await {
            match command {
                CartCommand::AddToCart { item, reply } => {
                    let result = self.products.add(item).map(|_| self.commit());
                    let _ = reply.send(result);
                }
                CartCommand::Increment { id, reply } => {
                    self.products.increment(&id);
                    let _ = reply.send(self.commit());
                }
                CartCommand::Decrement { id, reply } => {
                    self.products.decrement(&id);
                    let _ = reply.send(self.commit());
                }
                CartCommand::GetProducts { reply } => {
                    let _ = reply.send(self.products.clone());
                }
                CartCommand::Flush { reply } => self.forward_flush(reply),
            }
        }
        // Dropping `write_tx` here lets the writer drain what is queued and stop.
    }

    async fn load(&mut self) {
        let result = load_snapshot(self.storage.as_ref(), &self.key).await;
        let outcome = match result {
            Ok(loaded) => {
                if let Some(products) = loaded {
                    tracing::debug!(items = products.len(), "adopted persisted cart");
                    self.products = products;
                }
                let _ = self.bus.publish(CartEvent::Loaded(CartLoadedPayload {
                    products: self.products.clone(),
                }));
                Ok(())
            }
            Err(error) => {
                tracing::warn!("failed to load persisted cart: {}", error);
                let _ = self.bus.publish(CartEvent::LoadFailed(CartErrorPayload {
                    error: error.to_string(),
                }));
                Err(error)
            }
        };
        self.status_tx.send_replace(LoadState::Ready(outcome));
    }

    /// Publishes the mutated cart and queues its snapshot.
    fn commit(&mut self) -> CartCollection {
        self.revision += 1;

        let _ = self
            .bus
            .publish(CartEvent::ProductsChanged(ProductsChangedPayload {
                revision: self.revision,
                products: self.products.clone(),
            }));
        self.enqueue_write();
        self.products.clone()
    }

    /// Queues a full-collection overwrite. The caller never waits on it.
    fn enqueue_write(&self) {
        let snapshot = match self.products.to_json() {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(revision = self.revision, "failed to encode cart: {}", error);
                return;
            }
        };
        let command = WriteCommand::Persist {
            revision: self.revision,
            snapshot,
        };
        if self.write_tx.send(command).is_err() {
            tracing::warn!(revision = self.revision, "cart snapshot writer stopped");
        }
    }

    fn forward_flush(&self, reply: oneshot::Sender<CoreResult<()>>) {
        if let Err(mpsc::error::SendError(command)) =
            self.write_tx.send(WriteCommand::Flush { reply })
        {
            if let WriteCommand::Flush { reply } = command {
                let _ = reply.send(Err(CoreError::Internal(
                    "cart snapshot writer stopped".to_string(),
                )));
            }
        }
    }
}

/// Reads the persisted cart, if any. The record is trusted once it parses.
pub async fn load_snapshot(storage: &dyn Storage, key: &str) -> CoreResult<Option<CartCollection>> {
    match storage.read(key).await? {
        Some(data) => CartCollection::from_json(&data).map(Some),
        None => Ok(None),
    }
}
