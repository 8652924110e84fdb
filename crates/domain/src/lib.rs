//! Domain model for the basket-checkout system.
//!
//! This crate provides the shared data model:
//! - `Money` fixed-point amounts
//! - `Product` catalog entries with authoritative stock
//! - `BasketLine` soft-reservation line items
//! - `Order` rows with monotonic completion

mod basket;
mod money;
mod order;
mod product;

pub use basket::{BasketLine, LineId};
pub use money::Money;
pub use order::{Order, OrderError, OrderId, PaymentMethod};
pub use product::{Product, ProductId};
