//! Shared types for the basket-checkout system.

mod types;

pub use types::BasketId;
