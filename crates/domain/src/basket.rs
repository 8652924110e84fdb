//! Basket line items.

use chrono::{DateTime, Utc};
use common::BasketId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ProductId;

/// Unique identifier for a basket line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(Uuid);

impl LineId {
    /// Creates a new random line ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single line item in a basket.
///
/// Lines record intent only; stock is not reserved until the payment
/// commit. A basket is the insertion-ordered collection of its lines,
/// serialized as a whole into the basket store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketLine {
    /// Unique line identifier.
    pub id: LineId,

    /// The basket this line belongs to.
    pub basket_id: BasketId,

    /// The product being reserved.
    pub product_id: ProductId,

    /// Quantity requested, always greater than zero.
    pub quantity: u32,

    /// When this line was created or last mutated.
    pub last_updated: DateTime<Utc>,
}

impl BasketLine {
    /// Creates a new line with a fresh ID and a now-timestamp.
    pub fn new(basket_id: BasketId, product_id: ProductId, quantity: u32) -> Self {
        Self {
            id: LineId::new(),
            basket_id,
            product_id,
            quantity,
            last_updated: Utc::now(),
        }
    }

    /// Bumps the quantity and refreshes the timestamp.
    pub fn increase(&mut self, quantity: u32) {
        self.quantity += quantity;
        self.last_updated = Utc::now();
    }

    /// Reduces the quantity and refreshes the timestamp.
    ///
    /// Callers are responsible for removing the line once the quantity
    /// would fall to zero or below.
    pub fn decrease(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_sub(quantity);
        self.last_updated = Utc::now();
    }
}
