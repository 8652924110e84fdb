//! Durable order rows, one per basket identifier.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::BasketId;
use domain::{Order, OrderId};
use tokio::sync::RwLock;

use crate::{Result, StoreError};

/// Order persistence: one order row per basket identifier.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Creates an open order row, or refreshes the date and total of the
    /// existing non-completed row for the same basket.
    ///
    /// Fails with [`StoreError::OrderAlreadyCompleted`] if the basket's row
    /// has already concluded. Returns the stored row.
    async fn upsert_open(&self, order: Order) -> Result<Order>;

    /// Returns the order row for a basket, completed or not.
    ///
    /// Completed rows stay observable so callers can distinguish "never
    /// checked out" from "purchase already concluded".
    async fn find_by_basket_id(&self, basket_id: &BasketId) -> Result<Option<Order>>;

    /// Marks an order completed (soft delete: the row persists, the flag
    /// flips exactly once).
    async fn mark_completed(&self, order_id: OrderId) -> Result<()>;
}

#[derive(Default)]
struct OrderStoreState {
    orders: HashMap<BasketId, Order>,
    fail_on_mark_completed: bool,
    fail_on_upsert: bool,
}

/// In-memory order store implementation.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<OrderStoreState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail completion, for abort-path tests.
    pub async fn set_fail_on_mark_completed(&self, fail: bool) {
        self.state.write().await.fail_on_mark_completed = fail;
    }

    /// Configures the store to fail upserts, for abort-path tests.
    pub async fn set_fail_on_upsert(&self, fail: bool) {
        self.state.write().await.fail_on_upsert = fail;
    }

    /// Returns the number of stored order rows.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn upsert_open(&self, order: Order) -> Result<Order> {
        let mut state = self.state.write().await;
        if state.fail_on_upsert {
            return Err(StoreError::Backend("order upsert failed".to_string()));
        }

        match state.orders.get_mut(&order.basket_id()) {
            Some(existing) if existing.is_completed() => {
                Err(StoreError::OrderAlreadyCompleted(existing.id()))
            }
            Some(existing) => {
                existing.refresh(order.total_price());
                Ok(existing.clone())
            }
            None => {
                state.orders.insert(order.basket_id(), order.clone());
                Ok(order)
            }
        }
    }

    async fn find_by_basket_id(&self, basket_id: &BasketId) -> Result<Option<Order>> {
        Ok(self.state.read().await.orders.get(basket_id).cloned())
    }

    async fn mark_completed(&self, order_id: OrderId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_mark_completed {
            return Err(StoreError::Backend("order completion failed".to_string()));
        }

        let order = state
            .orders
            .values_mut()
            .find(|o| o.id() == order_id)
            .ok_or(StoreError::OrderNotFound(order_id))?;

        order
            .complete()
            .map_err(|_| StoreError::OrderAlreadyCompleted(order_id))
    }
}
