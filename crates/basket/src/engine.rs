//! Line-item mutation rules.

use common::BasketId;
use domain::{BasketLine, ProductId};
use stores::{BasketStore, CatalogAccess, StoreError};

use crate::BasketError;

/// The basket engine.
///
/// Reads live availability from the catalog and persists the full line
/// collection back to the basket store on every mutation. Availability
/// checks here are soft reservations only; the payment commit re-validates
/// against live stock.
pub struct BasketEngine<C, B>
where
    C: CatalogAccess,
    B: BasketStore,
{
    catalog: C,
    store: B,
}

impl<C, B> BasketEngine<C, B>
where
    C: CatalogAccess,
    B: BasketStore,
{
    /// Creates a new basket engine over the given collaborators.
    pub fn new(catalog: C, store: B) -> Self {
        Self { catalog, store }
    }

    /// Returns the basket's lines in insertion order.
    ///
    /// An absent basket is an empty basket. Stored content that fails to
    /// deserialize is logged and also treated as empty: losing a corrupt
    /// basket is recoverable, failing every later call on it is not.
    #[tracing::instrument(skip(self))]
    pub async fn lines(&self, basket_id: &BasketId) -> Result<Vec<BasketLine>, BasketError> {
        let Some(bytes) = self.store.read(basket_id).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_slice(&bytes) {
            Ok(lines) => Ok(lines),
            Err(error) => {
                tracing::error!(%basket_id, %error, "stored basket failed to parse, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Adds `quantity` units of a product to the basket.
    ///
    /// The whole resulting line, not just the increment, is bounded by the
    /// product's live availability. Creates a fresh line on first add of a
    /// product, bumps the existing line otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn add_items(
        &self,
        basket_id: &BasketId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), BasketError> {
        if quantity == 0 {
            return Err(BasketError::InvalidQuantity(quantity));
        }

        let product = self
            .catalog
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| BasketError::ProductNotFound(product_id.clone()))?;

        let mut lines = self.lines(basket_id).await?;
        let current = lines
            .iter()
            .find(|line| &line.product_id == product_id)
            .map(|line| line.quantity)
            .unwrap_or(0);

        if u64::from(current) + u64::from(quantity) > u64::from(product.available) {
            tracing::warn!(
                %basket_id,
                %product_id,
                current,
                quantity,
                available = product.available,
                "add rejected, basket line would exceed availability"
            );
            return Err(BasketError::InsufficientStock {
                product_id: product_id.clone(),
                requested: current + quantity,
                available: product.available,
            });
        }

        match lines.iter_mut().find(|line| &line.product_id == product_id) {
            Some(line) => line.increase(quantity),
            None => lines.push(BasketLine::new(*basket_id, product_id.clone(), quantity)),
        }

        self.persist(basket_id, &lines).await?;
        metrics::counter!("basket_items_added_total").increment(u64::from(quantity));
        Ok(())
    }

    /// Removes `quantity` units of a product from the basket.
    ///
    /// The catalog is consulted before the basket, so an unknown product is
    /// `ProductNotFound` even when the basket holds no line for it. A line
    /// whose quantity falls to zero or below is deleted.
    #[tracing::instrument(skip(self))]
    pub async fn remove_items(
        &self,
        basket_id: &BasketId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), BasketError> {
        if quantity == 0 {
            return Err(BasketError::InvalidQuantity(quantity));
        }

        self.catalog
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| BasketError::ProductNotFound(product_id.clone()))?;

        let mut lines = self.lines(basket_id).await?;
        let Some(pos) = lines.iter().position(|line| &line.product_id == product_id) else {
            tracing::warn!(%basket_id, %product_id, "remove rejected, no line for product");
            return Err(BasketError::LineNotFound(product_id.clone()));
        };

        if quantity >= lines[pos].quantity {
            lines.remove(pos);
        } else {
            lines[pos].decrease(quantity);
        }

        self.persist(basket_id, &lines).await
    }

    /// Removes the basket's entire stored collection. Idempotent.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self, basket_id: &BasketId) -> Result<(), BasketError> {
        self.store.delete(basket_id).await?;
        Ok(())
    }

    async fn persist(&self, basket_id: &BasketId, lines: &[BasketLine]) -> Result<(), BasketError> {
        let bytes = serde_json::to_vec(lines).map_err(StoreError::from)?;
        self.store.write(basket_id, bytes).await?;
        Ok(())
    }
}
