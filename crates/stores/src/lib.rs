//! Collaborator contracts consumed by the basket and checkout engines.
//!
//! Each contract is an async trait with an in-memory implementation:
//! - [`CatalogAccess`] — read-only product lookup plus the commit-time
//!   stock decrement
//! - [`BasketStore`] — per-basket serialized line collections, raw bytes
//! - [`OrderStore`] — one durable order row per basket identifier
//!
//! The in-memory implementations are the system's current backing store
//! and double as test fixtures; the traits are the seam for anything
//! durable.

mod basket;
mod catalog;
mod error;
mod order;

pub use basket::{BasketStore, InMemoryBasketStore};
pub use catalog::{CatalogAccess, InMemoryCatalog};
pub use error::{Result, StoreError};
pub use order::{InMemoryOrderStore, OrderStore};
