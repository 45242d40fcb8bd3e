//! Ambient access to a [`CartHandle`] for code that cannot take it as a
//! parameter. Passing the handle explicitly is preferred.

use std::future::Future;

use crate::error::{CoreError, CoreResult};
use crate::store::CartHandle;

tokio::task_local! {
    static CURRENT_CART: CartHandle;
}

pub struct CartProvider {
    handle: CartHandle,
}

impl CartProvider {
    pub fn new(handle: CartHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &CartHandle {
        &self.handle
    }

    /// Runs `future` with this cart reachable through [`use_cart`].
    pub async fn scope<F: Future>(&self, future: F) -> F::Output {
        CURRENT_CART.scope(self.handle.clone(), future).await
    }

    pub fn sync_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        CURRENT_CART.sync_scope(self.handle.clone(), f)
    }
}

/// Returns the cart of the enclosing [`CartProvider`] scope.
pub fn use_cart() -> CoreResult<CartHandle> {
    CURRENT_CART.try_with(CartHandle::clone).map_err(|_| {
        CoreError::Usage("use_cart must be used within a CartProvider".to_string())
    })
}
