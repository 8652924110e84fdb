//! Checkout error types.
//!
//! Everything here is a hard failure. Business outcomes — invalid basket,
//! empty basket, already-completed order — are boolean/`None` results, not
//! errors.

use basket::BasketError;
use domain::{OrderError, ProductId};
use stores::StoreError;
use thiserror::Error;

/// Errors that can occur during checkout and payment commit.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The basket engine failed.
    #[error("Basket error: {0}")]
    Basket(#[from] BasketError),

    /// A backing store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The order row rejected a state transition.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// A line's product vanished from the catalog at pricing time.
    ///
    /// Pricing fails closed; `checkout` maps this to ineligible.
    #[error("Price unavailable for product {0}: no longer in catalog")]
    PriceUnavailable(ProductId),

    /// The external payment gateway declined or failed.
    #[error("Payment authorization failed: {0}")]
    PaymentDeclined(String),
}
