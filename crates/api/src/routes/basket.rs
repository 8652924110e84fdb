//! Basket mutation endpoints.
//!
//! Every handler resolves the basket identity from the client session and
//! persists the session back, so the first request on a session pins the
//! basket id for all later ones.

use std::sync::Arc;

use ::basket::resolve_basket_id;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use domain::{BasketLine, ProductId};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;
use crate::routes::load_session;

#[derive(Deserialize)]
pub struct MutateLineRequest {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct LineResponse {
    pub line_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub last_updated: String,
}

#[derive(Serialize)]
pub struct BasketResponse {
    pub basket_id: String,
    pub lines: Vec<LineResponse>,
}

impl From<BasketLine> for LineResponse {
    fn from(line: BasketLine) -> Self {
        Self {
            line_id: line.id.to_string(),
            product_id: line.product_id.to_string(),
            quantity: line.quantity,
            last_updated: line.last_updated.to_rfc3339(),
        }
    }
}

/// GET /basket — list the session's basket lines.
#[tracing::instrument(skip(state, headers))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BasketResponse>, ApiError> {
    let (session_id, mut session) = load_session(&state, &headers).await?;
    let basket_id = resolve_basket_id(&mut session);

    let lines = state.engine.basket().lines(&basket_id).await?;
    state.sessions.store(&session_id, session).await;

    Ok(Json(BasketResponse {
        basket_id: basket_id.to_string(),
        lines: lines.into_iter().map(Into::into).collect(),
    }))
}

/// POST /basket/items — add quantity of a product to the basket.
#[tracing::instrument(skip(state, headers, req))]
pub async fn add_items(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<MutateLineRequest>,
) -> Result<Json<BasketResponse>, ApiError> {
    let (session_id, mut session) = load_session(&state, &headers).await?;
    let basket_id = resolve_basket_id(&mut session);

    state
        .engine
        .basket()
        .add_items(&basket_id, &ProductId::new(&req.product_id), req.quantity)
        .await?;

    let lines = state.engine.basket().lines(&basket_id).await?;
    state.sessions.store(&session_id, session).await;

    Ok(Json(BasketResponse {
        basket_id: basket_id.to_string(),
        lines: lines.into_iter().map(Into::into).collect(),
    }))
}

/// DELETE /basket/items — remove quantity of a product from the basket.
#[tracing::instrument(skip(state, headers, req))]
pub async fn remove_items(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<MutateLineRequest>,
) -> Result<Json<BasketResponse>, ApiError> {
    let (session_id, mut session) = load_session(&state, &headers).await?;
    let basket_id = resolve_basket_id(&mut session);

    state
        .engine
        .basket()
        .remove_items(&basket_id, &ProductId::new(&req.product_id), req.quantity)
        .await?;

    let lines = state.engine.basket().lines(&basket_id).await?;
    state.sessions.store(&session_id, session).await;

    Ok(Json(BasketResponse {
        basket_id: basket_id.to_string(),
        lines: lines.into_iter().map(Into::into).collect(),
    }))
}

/// DELETE /basket — drop every line in the basket.
#[tracing::instrument(skip(state, headers))]
pub async fn clear(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let (session_id, mut session) = load_session(&state, &headers).await?;
    let basket_id = resolve_basket_id(&mut session);

    state.engine.basket().clear(&basket_id).await?;
    state.sessions.store(&session_id, session).await;

    Ok(StatusCode::NO_CONTENT)
}
