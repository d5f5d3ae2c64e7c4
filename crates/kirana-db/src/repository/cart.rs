//! # Cart Repository
//!
//! Keeps the in-progress sale under the `cart` key so it survives a
//! restart of the counter application.

use kirana_core::Cart;
use tracing::debug;

use crate::error::DbResult;
use crate::store::{keys, KvStore};

#[derive(Debug, Clone)]
pub struct CartRepository {
    store: KvStore,
}

impl CartRepository {
    pub fn new(store: KvStore) -> Self {
        CartRepository { store }
    }

    pub async fn load(&self) -> DbResult<Cart> {
        Ok(self.store.get(keys::CART).await?.unwrap_or_default())
    }

    pub async fn save(&self, cart: &Cart) -> DbResult<()> {
        debug!(lines = cart.len(), "Saving cart");
        self.store.set(keys::CART, cart).await
    }

    /// Empties the cart.
    pub async fn clear(&self) -> DbResult<()> {
        self.store.remove(keys::CART).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
