//! Catalog access: product lookup and the commit-time stock decrement.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{BasketLine, Product, ProductId};
use tokio::sync::RwLock;

use crate::{Result, StoreError};

/// Read-mostly product catalog with authoritative stock counts.
///
/// Stock is mutated only through [`decrement_stock`](CatalogAccess::decrement_stock)
/// (and its compensating inverse); basket mutations never touch it.
#[async_trait]
pub trait CatalogAccess: Send + Sync {
    /// Returns every product currently in the catalog.
    async fn list_all(&self) -> Result<Vec<Product>>;

    /// Looks up a single product by ID.
    async fn get_by_id(&self, product_id: &ProductId) -> Result<Option<Product>>;

    /// Decrements stock for every line in the batch.
    ///
    /// The batch is all-or-nothing: lines whose product ID is missing are
    /// logged and skipped, but if any present product lacks stock the whole
    /// batch fails with no partial application.
    async fn decrement_stock(&self, lines: &[BasketLine]) -> Result<()>;

    /// Restores stock for every line in the batch.
    ///
    /// Compensating inverse of [`decrement_stock`](CatalogAccess::decrement_stock),
    /// used when a commit aborts after the decrement was applied. Missing
    /// products are logged and skipped.
    async fn restock(&self, lines: &[BasketLine]) -> Result<()>;
}

/// In-memory catalog implementation.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryCatalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog pre-populated with the given products.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let map = products
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect::<HashMap<_, _>>();
        Self {
            products: Arc::new(RwLock::new(map)),
        }
    }

    /// Inserts or replaces a product.
    pub async fn insert(&self, product: Product) {
        self.products
            .write()
            .await
            .insert(product.id.clone(), product);
    }

    /// Removes a product from the catalog, returning it if it existed.
    pub async fn remove(&self, product_id: &ProductId) -> Option<Product> {
        self.products.write().await.remove(product_id)
    }

    /// Returns the current availability of a product, if it exists.
    pub async fn available(&self, product_id: &ProductId) -> Option<u32> {
        self.products
            .read()
            .await
            .get(product_id)
            .map(|p| p.available)
    }
}

#[async_trait]
impl CatalogAccess for InMemoryCatalog {
    async fn list_all(&self) -> Result<Vec<Product>> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn get_by_id(&self, product_id: &ProductId) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(product_id).cloned())
    }

    async fn decrement_stock(&self, lines: &[BasketLine]) -> Result<()> {
        let mut products = self.products.write().await;

        // Validate the whole batch under the write lock before applying
        // anything, so a failure leaves stock untouched.
        for line in lines {
            if let Some(product) = products.get(&line.product_id) {
                if product.available < line.quantity {
                    return Err(StoreError::InsufficientStock {
                        product_id: line.product_id.clone(),
                        requested: line.quantity,
                        available: product.available,
                    });
                }
            } else {
                tracing::warn!(
                    product_id = %line.product_id,
                    "stock decrement skipped, product no longer in catalog"
                );
            }
        }

        for line in lines {
            if let Some(product) = products.get_mut(&line.product_id) {
                product.available -= line.quantity;
            }
        }

        Ok(())
    }

    async fn restock(&self, lines: &[BasketLine]) -> Result<()> {
        let mut products = self.products.write().await;

        for line in lines {
            match products.get_mut(&line.product_id) {
                Some(product) => product.available += line.quantity,
                None => tracing::warn!(
                    product_id = %line.product_id,
                    "restock skipped, product no longer in catalog"
                ),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::BasketId;
    use domain::Money;

    fn seeded_catalog() -> InMemoryCatalog {
        InMemoryCatalog::with_products(vec![
            Product::new("AA1ITC", "Italian Coffee", Money::from_cents(110), 10),
            Product::new("BB2TEA", "Tea", Money::from_cents(300), 1),
        ])
    }

    fn line(product_id: &str, quantity: u32) -> BasketLine {
        BasketLine::new(BasketId::new(), ProductId::new(product_id), quantity)
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let catalog = seeded_catalog();

        assert_eq!(catalog.list_all().await.unwrap().len(), 2);
        let tea = catalog
            .get_by_id(&ProductId::new("BB2TEA"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tea.available, 1);
        assert!(
            catalog
                .get_by_id(&ProductId::new("ZZ9MISSING"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_decrement_applies_whole_batch() {
        let catalog = seeded_catalog();

        catalog
            .decrement_stock(&[line("AA1ITC", 4), line("BB2TEA", 1)])
            .await
            .unwrap();

        assert_eq!(catalog.available(&ProductId::new("AA1ITC")).await, Some(6));
        assert_eq!(catalog.available(&ProductId::new("BB2TEA")).await, Some(0));
    }

    #[tokio::test]
    async fn test_decrement_insufficient_stock_leaves_batch_unapplied() {
        let catalog = seeded_catalog();

        let result = catalog
            .decrement_stock(&[line("AA1ITC", 4), line("BB2TEA", 2)])
            .await;

        assert!(matches!(
            result,
            Err(StoreError::InsufficientStock { requested: 2, available: 1, .. })
        ));
        // First line must not have been applied either.
        assert_eq!(catalog.available(&ProductId::new("AA1ITC")).await, Some(10));
    }

    #[tokio::test]
    async fn test_decrement_tolerates_missing_products() {
        let catalog = seeded_catalog();

        catalog
            .decrement_stock(&[line("ZZ9MISSING", 3), line("AA1ITC", 2)])
            .await
            .unwrap();

        assert_eq!(catalog.available(&ProductId::new("AA1ITC")).await, Some(8));
    }

    #[tokio::test]
    async fn test_restock_reverses_decrement() {
        let catalog = seeded_catalog();

        let lines = [line("AA1ITC", 4)];
        catalog.decrement_stock(&lines).await.unwrap();
        catalog.restock(&lines).await.unwrap();

        assert_eq!(catalog.available(&ProductId::new("AA1ITC")).await, Some(10));
    }
}
