//! Checkout and payment endpoints.

use std::sync::Arc;

use ::basket::resolve_basket_id;
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use domain::Order;
use serde::Serialize;
use stores::OrderStore;

use crate::AppState;
use crate::error::ApiError;
use crate::routes::load_session;

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub eligible: bool,
    pub payment_methods: Vec<String>,
}

#[derive(Serialize)]
pub struct PayResponse {
    pub paid: bool,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub order_id: String,
    pub basket_id: String,
    pub order_date: String,
    pub completed: bool,
    pub total_cents: i64,
    pub payment_method: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id().to_string(),
            basket_id: order.basket_id().to_string(),
            order_date: order.order_date().to_rfc3339(),
            completed: order.is_completed(),
            total_cents: order.total_price().cents(),
            payment_method: order.payment_method().to_string(),
        }
    }
}

/// POST /checkout — validate and price the basket, returning eligibility.
///
/// An ineligible basket (invalid lines, empty, or concluded purchase) is a
/// 200 with `eligible: false`, not an error.
#[tracing::instrument(skip(state, headers))]
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let (session_id, mut session) = load_session(&state, &headers).await?;
    let basket_id = resolve_basket_id(&mut session);

    let methods = state.engine.checkout(&basket_id).await?;
    state.sessions.store(&session_id, session).await;

    Ok(Json(match methods {
        Some(methods) => CheckoutResponse {
            eligible: true,
            payment_methods: methods.iter().map(|m| m.to_string()).collect(),
        },
        None => CheckoutResponse {
            eligible: false,
            payment_methods: Vec::new(),
        },
    }))
}

/// POST /pay — run the payment commit for the session's basket.
///
/// `paid: false` covers every ineligible outcome; hard failures (store,
/// gateway) surface as error responses.
#[tracing::instrument(skip(state, headers))]
pub async fn pay(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PayResponse>, ApiError> {
    let (session_id, mut session) = load_session(&state, &headers).await?;
    let basket_id = resolve_basket_id(&mut session);

    let paid = state.engine.pay(&basket_id, &mut session).await?;
    state.sessions.store(&session_id, session).await;

    Ok(Json(PayResponse { paid }))
}

/// GET /order — fetch the order row for the session's basket.
#[tracing::instrument(skip(state, headers))]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<OrderResponse>, ApiError> {
    let (session_id, mut session) = load_session(&state, &headers).await?;
    let basket_id = resolve_basket_id(&mut session);

    let order = state
        .orders
        .find_by_basket_id(&basket_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    state.sessions.store(&session_id, session).await;

    order
        .map(|order| Json(order.into()))
        .ok_or_else(|| ApiError::NotFound(format!("No order for basket {basket_id}")))
}
