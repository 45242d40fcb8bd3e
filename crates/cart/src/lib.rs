//! Persisted shopping-cart store.
//!
//! A [`CartHandle`] exposes the cart contents and the add / increment /
//! decrement operations. The store loads the previous snapshot from a
//! [`Storage`] backend at startup and overwrites it after every change,
//! in order, on a dedicated writer task. Changes are published on a
//! [`Bus`] as [`CartEvent`]s.

pub mod bus;
pub mod config;
pub mod error;
pub mod event;
pub mod product;
pub mod provider;
pub mod storage;
pub mod store;

pub use crate::bus::Bus;
pub use crate::config::{load_or_create_cart_config, CartConfig, DEFAULT_STORAGE_KEY};
pub use crate::error::{CoreError, CoreResult};
pub use crate::event::CartEvent;
pub use crate::product::{CartCollection, CartSummary, LineItem, NewLineItem};
pub use crate::provider::{use_cart, CartProvider};
pub use crate::storage::{FileStorage, MemoryStorage, SharedStorage, Storage};
pub use crate::store::{open_cart_store, spawn_cart_store, CartHandle, CartStatus};
