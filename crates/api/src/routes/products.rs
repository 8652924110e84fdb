//! Catalog browsing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use domain::{Product, ProductId};
use serde::Serialize;
use stores::CatalogAccess;

use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub available: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name,
            unit_price_cents: product.unit_price.cents(),
            available: product.available,
            description: product.description,
        }
    }
}

/// GET /products — list the full catalog.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let mut products = state
        .catalog
        .list_all()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    products.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /products/:id — look up a single product.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .catalog
        .get_by_id(&ProductId::new(&id))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;

    Ok(Json(product.into()))
}
