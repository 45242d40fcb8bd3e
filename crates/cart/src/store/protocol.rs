use tokio::sync::oneshot;

use crate::error::{CoreError, CoreResult};
use crate::product::{CartCollection, NewLineItem};

pub(crate) enum CartCommand {
    AddToCart {
        item: NewLineItem,
        reply: oneshot::Sender<CoreResult<CartCollection>>,
    },
    Increment {
        id: String,
        reply: oneshot::Sender<CartCollection>,
    },
    Decrement {
        id: String,
        reply: oneshot::Sender<CartCollection>,
    },
    GetProducts {
        reply: oneshot::Sender<CartCollection>,
    },
    Flush {
        reply: oneshot::Sender<CoreResult<()>>,
    },
}

pub(crate) enum WriteCommand {
    Persist { revision: u64, snapshot: String },
    Flush { reply: oneshot::Sender<CoreResult<()>> },
}

/// Startup progress shared from the actor to every handle.
#[derive(Debug, Clone)]
pub(crate) enum LoadState {
    Loading,
    Ready(Result<(), CoreError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartStatus {
    Loading,
    Ready,
}

impl From<&LoadState> for CartStatus {
    fn from(state: &LoadState) -> Self {
        match state {
            LoadState::Loading => CartStatus::Loading,
            LoadState::Ready(_) => CartStatus::Ready,
        }
    }
}
