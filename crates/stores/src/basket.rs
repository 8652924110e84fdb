//! Session-backed basket storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::BasketId;
use tokio::sync::RwLock;

use crate::{Result, StoreError};

/// Per-basket serialized line collections, keyed by basket-ID string form.
///
/// The store holds opaque bytes; the basket engine owns the encoding.
#[async_trait]
pub trait BasketStore: Send + Sync {
    /// Reads the stored bytes for a basket, if any.
    async fn read(&self, basket_id: &BasketId) -> Result<Option<Vec<u8>>>;

    /// Writes the full serialized line collection for a basket.
    async fn write(&self, basket_id: &BasketId, bytes: Vec<u8>) -> Result<()>;

    /// Deletes the stored collection for a basket. Idempotent.
    async fn delete(&self, basket_id: &BasketId) -> Result<()>;
}

#[derive(Default)]
struct BasketStoreState {
    baskets: HashMap<String, Vec<u8>>,
    fail_on_write: bool,
}

/// In-memory basket store implementation.
#[derive(Clone, Default)]
pub struct InMemoryBasketStore {
    state: Arc<RwLock<BasketStoreState>>,
}

impl InMemoryBasketStore {
    /// Creates a new empty basket store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail writes, for abort-path tests.
    pub async fn set_fail_on_write(&self, fail: bool) {
        self.state.write().await.fail_on_write = fail;
    }

    /// Returns the number of baskets with stored content.
    pub async fn basket_count(&self) -> usize {
        self.state.read().await.baskets.len()
    }
}

#[async_trait]
impl BasketStore for InMemoryBasketStore {
    async fn read(&self, basket_id: &BasketId) -> Result<Option<Vec<u8>>> {
        Ok(self
            .state
            .read()
            .await
            .baskets
            .get(&basket_id.to_string())
            .cloned())
    }

    async fn write(&self, basket_id: &BasketId, bytes: Vec<u8>) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_write {
            return Err(StoreError::Backend("basket write failed".to_string()));
        }
        state.baskets.insert(basket_id.to_string(), bytes);
        Ok(())
    }

    async fn delete(&self, basket_id: &BasketId) -> Result<()> {
        self.state
            .write()
            .await
            .baskets
            .remove(&basket_id.to_string());
        Ok(())
    }
}
