//! Checkout engine for the basket-checkout system.
//!
//! Orchestrates validation, pricing, payment-method eligibility, and order
//! upsert. The payment commit runs the whole decrement/complete/clear
//! sequence under a per-basket serialization point, with compensating
//! restock when completion fails after the decrement.

mod engine;
mod error;
mod gateway;

pub use engine::{CASH_PAYMENT_THRESHOLD, CheckoutEngine};
pub use error::CheckoutError;
pub use gateway::{InMemoryPaymentGateway, PaymentGateway};
