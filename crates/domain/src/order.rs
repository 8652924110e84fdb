//! Order rows and the completion state machine.

use chrono::{DateTime, Utc};
use common::BasketId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::Money;

/// Unique identifier for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a new random order ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment methods a checkout can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Card payment, always eligible.
    #[default]
    Card,

    /// Cash payment, eligible below the cash threshold.
    Cash,
}

impl PaymentMethod {
    /// Returns the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::Cash => "Cash",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur on order rows.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order's purchase has already concluded.
    #[error("Order {0} is already completed")]
    AlreadyCompleted(OrderId),
}

/// A durable order row, one per basket identifier.
///
/// The lifecycle is driven by `completed`: a row is created open on the
/// first successful checkout, refreshed in place on re-checkout, and
/// completed exactly once by a successful payment commit. A completed row
/// persists as evidence the basket's purchase concluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    basket_id: BasketId,
    order_date: DateTime<Utc>,
    completed: bool,
    total_price: Money,
    payment_method: PaymentMethod,
}

impl Order {
    /// Creates a new open order for a basket.
    pub fn new(basket_id: BasketId, total_price: Money) -> Self {
        Self {
            id: OrderId::new(),
            basket_id,
            order_date: Utc::now(),
            completed: false,
            total_price,
            payment_method: PaymentMethod::default(),
        }
    }

    /// Returns the order identifier.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Returns the basket this order belongs to.
    pub fn basket_id(&self) -> BasketId {
        self.basket_id
    }

    /// Returns when the order was created or last refreshed.
    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    /// Returns true once the purchase has concluded.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the recorded total.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Returns the selected payment method.
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Refreshes the date and total in place on re-checkout.
    pub fn refresh(&mut self, total_price: Money) {
        self.order_date = Utc::now();
        self.total_price = total_price;
    }

    /// Marks the purchase as concluded.
    ///
    /// Monotonic: the flag flips false to true exactly once and never
    /// reverts.
    pub fn complete(&mut self) -> Result<(), OrderError> {
        if self.completed {
            return Err(OrderError::AlreadyCompleted(self.id));
        }
        self.completed = true;
        Ok(())
    }
}
