//! Basket engine for the basket-checkout system.
//!
//! Owns basket-identity resolution and every line-item mutation rule:
//! quantity bounds are enforced against live catalog availability at
//! mutation time as a soft reservation, re-validated again by the payment
//! commit.

mod engine;
mod error;
mod session;

pub use engine::BasketEngine;
pub use error::BasketError;
pub use session::{Session, derive_basket_id, resolve_basket_id};
