use domain::{OrderId, ProductId};
use thiserror::Error;

/// Errors that can occur when interacting with the backing stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No order row exists with the given ID.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order row for this basket has already been completed.
    #[error("Order {0} is already completed")]
    OrderAlreadyCompleted(OrderId),

    /// A stock decrement would take a product below zero.
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
