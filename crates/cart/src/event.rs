use serde::Serialize;

use crate::product::CartCollection;

/// Notifications published on the cart [`Bus`](crate::bus::Bus).
///
/// `revision` counts applied mutations since startup; the loaded snapshot is
/// revision 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum CartEvent {
    Loaded(CartLoadedPayload),
    LoadFailed(CartErrorPayload),
    ProductsChanged(ProductsChangedPayload),
    PersistFailed(PersistFailedPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLoadedPayload {
    pub products: CartCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartErrorPayload {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductsChangedPayload {
    pub revision: u64,
    pub products: CartCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistFailedPayload {
    pub revision: u64,
    pub error: String,
}
