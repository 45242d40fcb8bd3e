use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::event::CartEvent;

#[derive(Clone)]
pub struct Bus {
    sender: broadcast::Sender<CartEvent>,
}

impl Bus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.sender.subscribe()
    }

    /// Like [`Bus::subscribe`], skipping notifications dropped by a slow reader.
    pub fn stream(&self) -> impl Stream<Item = CartEvent> {
        BroadcastStream::new(self.sender.subscribe()).filter_map(|message| match message {
            Ok(event) => Some(event),
            Err(error) => {
                tracing::debug!("cart event subscriber lagged: {error}");
                None
            }
        })
    }

    pub fn publish(
        &self,
        event: CartEvent,
    ) -> Result<usize, broadcast::error::SendError<CartEvent>> {
        self.sender.send(event)
    }
}
