//! Basket engine error types.

use domain::ProductId;
use stores::StoreError;
use thiserror::Error;

/// Errors that can occur during basket mutations.
#[derive(Debug, Error)]
pub enum BasketError {
    /// Mutation quantities must be greater than zero.
    #[error("Invalid quantity: {0} (must be greater than 0)")]
    InvalidQuantity(u32),

    /// The product is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The basket line would exceed the product's live availability.
    #[error(
        "Insufficient stock for product {product_id}: basket would hold {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// No basket line exists for the product.
    #[error("No basket line for product {0}")]
    LineNotFound(ProductId),

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
