//! Payment gateway boundary.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{Order, OrderId};
use tokio::sync::RwLock;

use crate::CheckoutError;

/// External payment authorization boundary.
///
/// Card payments cross this boundary during the payment commit. Real
/// gateway integration is out of scope; the call is a side-effecting no-op
/// that may fail, and a failure aborts the commit as a hard error.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Authorizes a card payment for the order's recorded total.
    async fn authorize(&self, order: &Order) -> Result<(), CheckoutError>;
}

#[derive(Default)]
struct GatewayState {
    authorized: Vec<OrderId>,
    fail_on_authorize: bool,
}

/// In-memory payment gateway stub.
#[derive(Clone, Default)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<GatewayState>>,
}

impl InMemoryPaymentGateway {
    /// Creates a new gateway stub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to decline the next authorization.
    pub async fn set_fail_on_authorize(&self, fail: bool) {
        self.state.write().await.fail_on_authorize = fail;
    }

    /// Returns the number of authorizations performed.
    pub async fn authorization_count(&self) -> usize {
        self.state.read().await.authorized.len()
    }

    /// Returns true if the given order was authorized.
    pub async fn has_authorized(&self, order_id: OrderId) -> bool {
        self.state.read().await.authorized.contains(&order_id)
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn authorize(&self, order: &Order) -> Result<(), CheckoutError> {
        let mut state = self.state.write().await;

        if state.fail_on_authorize {
            return Err(CheckoutError::PaymentDeclined(
                "card declined".to_string(),
            ));
        }

        state.authorized.push(order.id());
        Ok(())
    }
}
