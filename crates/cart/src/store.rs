//! The cart store: an actor owning the collection, a handle for consumers,
//! and an ordered writer persisting every change.

mod actor;
mod handle;
mod protocol;
mod writer;

pub use actor::load_snapshot;
pub use handle::{open_cart_store, spawn_cart_store, CartHandle};
pub use protocol::CartStatus;
