use std::path::Path;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_stream::Stream;

use crate::bus::Bus;
use crate::config::{load_or_create_cart_config, CartConfig};
use crate::error::{CoreError, CoreResult};
use crate::event::CartEvent;
use crate::product::{CartCollection, CartSummary, NewLineItem};
use crate::storage::SharedStorage;
use crate::store::actor::CartStoreActor;
use crate::store::protocol::{CartCommand, CartStatus, LoadState};
use crate::store::writer::spawn_snapshot_writer;

/// Cloneable access to a running cart store.
///
/// Mutations resolve once the in-memory cart has been updated; persistence
/// happens afterwards on the store's writer queue. Use [`CartHandle::flush`]
/// to wait for it.
#[derive(Clone)]
pub struct CartHandle {
    command_tx: mpsc::UnboundedSender<CartCommand>,
    status_rx: watch::Receiver<LoadState>,
    bus: Bus,
}

impl CartHandle {
    pub fn status(&self) -> CartStatus {
        CartStatus::from(&*self.status_rx.borrow())
    }

    /// Waits for the persisted cart to be loaded and reports how that went.
    ///
    /// A failed load leaves the cart empty but usable.
    pub async fn ready(&self) -> CoreResult<()> {
        let mut status_rx = self.status_rx.clone();
        loop {
            let outcome = match &*status_rx.borrow_and_update() {
                LoadState::Ready(result) => Some(result.clone()),
                LoadState::Loading => None,
            };
            if let Some(result) = outcome {
                return result;
            }
            status_rx.changed().await.map_err(|_| {
                CoreError::Internal("cart store stopped before loading".to_string())
            })?;
        }
    }

    pub async fn products(&self) -> CoreResult<CartCollection> {
        self.request(|reply| CartCommand::GetProducts { reply }).await
    }

    pub async fn summary(&self) -> CoreResult<CartSummary> {
        Ok(self.products().await?.summary())
    }

    /// Fails with `InvalidInput` for a non-finite price; the cart is unchanged.
    pub async fn add_to_cart(&self, item: NewLineItem) -> CoreResult<CartCollection> {
        self.request(|reply| CartCommand::AddToCart { item, reply })
            .await?
    }

    pub async fn increment(&self, id: impl Into<String>) -> CoreResult<CartCollection> {
        let id = id.into();
        self.request(|reply| CartCommand::Increment { id, reply })
            .await
    }

    pub async fn decrement(&self, id: impl Into<String>) -> CoreResult<CartCollection> {
        let id = id.into();
        self.request(|reply| CartCommand::Decrement { id, reply })
            .await
    }

    /// Waits until every snapshot write issued before this call has finished.
    ///
    /// Returns the first write failure since the previous flush.
    pub async fn flush(&self) -> CoreResult<()> {
        self.request(|reply| CartCommand::Flush { reply }).await?
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.bus.subscribe()
    }

    pub fn events(&self) -> impl Stream<Item = CartEvent> {
        self.bus.stream()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> CartCommand,
    ) -> CoreResult<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(command(reply_tx))
            .map_err(|_| CoreError::Internal("cart store stopped".to_string()))?;
        reply_rx
            .await
            .map_err(|_| CoreError::Internal("cart store dropped response".to_string()))
    }
}

/// Starts the store actor and its writer. Loading begins immediately in the
/// background; commands sent meanwhile are applied after the load.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_cart_store(storage: SharedStorage, config: &CartConfig) -> CartHandle {
    let bus = Bus::new(config.event_capacity.max(1));
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (status_tx, status_rx) = watch::channel(LoadState::Loading);

    let write_tx = spawn_snapshot_writer(storage.clone(), config.storage_key.clone(), bus.clone());

    let actor = CartStoreActor::new(
        config.storage_key.clone(),
        storage,
        bus.clone(),
        command_rx,
        write_tx,
        status_tx,
    );

    tokio::spawn(async move {
        actor.run().await;
    });

    CartHandle {
        command_tx,
        status_rx,
        bus,
    }
}

/// Opens a file-backed cart under `dir`, creating `cart.json` if needed.
pub fn open_cart_store(dir: &Path) -> CoreResult<CartHandle> {
    let config = load_or_create_cart_config(dir)?;
    let storage: SharedStorage = Arc::new(config.file_storage(dir));
    Ok(spawn_cart_store(storage, &config))
}
