//! Validation, pricing, eligibility, and the payment commit.

use std::collections::HashMap;
use std::sync::Arc;

use basket::{BasketEngine, Session};
use common::BasketId;
use domain::{Money, Order, PaymentMethod};
use stores::{BasketStore, CatalogAccess, OrderStore, StoreError};
use tokio::sync::Mutex;

use crate::{CheckoutError, PaymentGateway};

/// Totals strictly below this amount are additionally eligible for cash.
pub const CASH_PAYMENT_THRESHOLD: Money = Money::from_cents(1_000);

/// The checkout engine.
///
/// Drives the per-basket order lifecycle: Uninitiated → Open on first
/// successful checkout, Open → Open on re-checkout, Open → Completed only
/// through a successful payment commit. Completed is terminal; the engine
/// never creates a replacement order for a basket whose purchase concluded.
pub struct CheckoutEngine<C, B, O, G>
where
    C: CatalogAccess + Clone,
    B: BasketStore,
    O: OrderStore,
    G: PaymentGateway,
{
    catalog: C,
    basket: BasketEngine<C, B>,
    orders: O,
    gateway: G,

    // Per-basket serialization points for the payment commit.
    locks: Mutex<HashMap<BasketId, Arc<Mutex<()>>>>,
}

impl<C, B, O, G> CheckoutEngine<C, B, O, G>
where
    C: CatalogAccess + Clone,
    B: BasketStore,
    O: OrderStore,
    G: PaymentGateway,
{
    /// Creates a new checkout engine over the given collaborators.
    pub fn new(catalog: C, store: B, orders: O, gateway: G) -> Self {
        let basket = BasketEngine::new(catalog.clone(), store);
        Self {
            catalog,
            basket,
            orders,
            gateway,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the basket engine sharing this engine's collaborators.
    pub fn basket(&self) -> &BasketEngine<C, B> {
        &self.basket
    }

    /// Checks every basket line against the current catalog listing.
    ///
    /// A line is valid when a product with its ID exists and has
    /// availability at or above the line quantity. An empty basket is
    /// vacuously valid. Every line is checked; one bad line invalidates
    /// the whole basket.
    #[tracing::instrument(skip(self))]
    pub async fn validate_basket(&self, basket_id: &BasketId) -> Result<bool, CheckoutError> {
        let lines = self.basket.lines(basket_id).await?;
        let products = self.catalog.list_all().await?;

        let mut valid = true;
        for line in &lines {
            let matched = products
                .iter()
                .any(|p| p.id == line.product_id && p.available >= line.quantity);
            if !matched {
                tracing::warn!(
                    %basket_id,
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    "basket line has no available product in the catalog"
                );
                valid = false;
            }
        }

        Ok(valid)
    }

    /// Sums quantity × live unit price over the basket's lines.
    ///
    /// Prices come from per-line catalog lookups at the instant of
    /// summation, not from a cached listing. Pricing fails closed: a line
    /// whose product vanished yields [`CheckoutError::PriceUnavailable`].
    #[tracing::instrument(skip(self))]
    pub async fn compute_total(&self, basket_id: &BasketId) -> Result<Money, CheckoutError> {
        let lines = self.basket.lines(basket_id).await?;

        let mut total = Money::zero();
        for line in &lines {
            let product = self
                .catalog
                .get_by_id(&line.product_id)
                .await?
                .ok_or_else(|| CheckoutError::PriceUnavailable(line.product_id.clone()))?;
            total += product.unit_price.multiply(line.quantity);
        }

        Ok(total)
    }

    /// Validates the basket, upserts the order row, and returns the
    /// eligible payment methods.
    ///
    /// Returns `None` when the basket is invalid, when a line's product
    /// vanished at pricing time, or when the basket's order row has already
    /// concluded. Despite its query-like shape this call persists order
    /// state: the row is created on first success and its date and total
    /// are refreshed on every later one.
    #[tracing::instrument(skip(self))]
    pub async fn checkout(
        &self,
        basket_id: &BasketId,
    ) -> Result<Option<Vec<PaymentMethod>>, CheckoutError> {
        if !self.validate_basket(basket_id).await? {
            tracing::warn!(%basket_id, "checkout rejected, basket is not valid");
            return Ok(None);
        }

        let total = match self.compute_total(basket_id).await {
            Ok(total) => total,
            Err(CheckoutError::PriceUnavailable(product_id)) => {
                tracing::warn!(%basket_id, %product_id, "checkout rejected, product vanished at pricing time");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if let Some(order) = self.orders.find_by_basket_id(basket_id).await? {
            if order.is_completed() {
                tracing::warn!(%basket_id, order_id = %order.id(), "checkout rejected, purchase already concluded");
                return Ok(None);
            }
        }

        match self.orders.upsert_open(Order::new(*basket_id, total)).await {
            Ok(_) => {}
            // Lost a race with a concurrent commit: treat as concluded.
            Err(StoreError::OrderAlreadyCompleted(order_id)) => {
                tracing::warn!(%basket_id, %order_id, "checkout rejected, purchase concluded concurrently");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }

        let mut methods = vec![PaymentMethod::Card];
        if total < CASH_PAYMENT_THRESHOLD {
            methods.push(PaymentMethod::Cash);
        }

        Ok(Some(methods))
    }

    /// Attempts to commit the basket's purchase.
    ///
    /// An empty basket is rejected up front, before the `checkout` re-run,
    /// so it never leaves an order row behind. Otherwise `checkout` runs
    /// first so the order row and total are current. Returns `Ok(false)` —
    /// logged, no catalog or order side effects — when the basket is
    /// empty, no order row exists, the order already concluded, or
    /// commit-time re-validation fails. Hard failures from the gateway or
    /// the stores propagate as errors with no partial stock decrement and
    /// no partial completion.
    #[tracing::instrument(skip(self, session))]
    pub async fn pay(
        &self,
        basket_id: &BasketId,
        session: &mut Session,
    ) -> Result<bool, CheckoutError> {
        metrics::counter!("payment_attempts_total").increment(1);

        // Checked before the checkout re-run: an empty basket must not
        // leave a zero-total order row behind.
        let lines = self.basket.lines(basket_id).await?;
        if lines.is_empty() {
            tracing::warn!(%basket_id, "payment rejected, basket is empty");
            return Ok(false);
        }

        self.checkout(basket_id).await?;

        let Some(order) = self.orders.find_by_basket_id(basket_id).await? else {
            tracing::warn!(%basket_id, "payment rejected, no order for basket");
            return Ok(false);
        };

        if order.is_completed() {
            tracing::warn!(%basket_id, order_id = %order.id(), "payment rejected, purchase already concluded");
            return Ok(false);
        }

        // Serialization point: the whole commit runs under this basket's
        // lock, so concurrent pay calls for one basket cannot both pass
        // the checks below.
        let lock = self.basket_lock(basket_id).await;
        let _guard = lock.lock().await;

        // Re-read under the lock; a concurrent commit may have concluded
        // the purchase while we waited.
        let Some(order) = self.orders.find_by_basket_id(basket_id).await? else {
            return Ok(false);
        };
        if order.is_completed() {
            tracing::warn!(%basket_id, order_id = %order.id(), "payment rejected, purchase concluded while waiting");
            return Ok(false);
        }

        // Stock may have moved since checkout ran.
        if !self.validate_basket(basket_id).await? {
            tracing::warn!(%basket_id, "payment rejected, basket no longer valid at commit time");
            return Ok(false);
        }

        if order.payment_method() == PaymentMethod::Card {
            self.gateway.authorize(&order).await.inspect_err(|error| {
                tracing::error!(%basket_id, order_id = %order.id(), %error, "payment authorization failed");
            })?;
        }

        self.catalog
            .decrement_stock(&lines)
            .await
            .inspect_err(|error| {
                tracing::error!(%basket_id, %error, "stock decrement failed, aborting commit");
            })?;

        if let Err(error) = self.orders.mark_completed(order.id()).await {
            // Compensate the decrement so a retried commit cannot
            // double-apply.
            tracing::error!(%basket_id, order_id = %order.id(), %error, "order completion failed, restoring stock");
            if let Err(restock_error) = self.catalog.restock(&lines).await {
                tracing::error!(%basket_id, %restock_error, "compensating restock failed");
            }
            return Err(error.into());
        }

        self.basket.clear(basket_id).await?;
        session.clear_basket_token();

        // The completed order now gates any retry, so the serialization
        // point is no longer needed and the registry entry can go.
        self.locks.lock().await.remove(basket_id);

        metrics::counter!("payments_completed_total").increment(1);
        tracing::info!(%basket_id, order_id = %order.id(), total = %order.total_price(), "payment committed");
        Ok(true)
    }

    async fn basket_lock(&self, basket_id: &BasketId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(*basket_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    #[cfg(test)]
    async fn lock_count(&self) -> usize {
        self.locks.lock().await.len()
    }
}
