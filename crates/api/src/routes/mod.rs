//! HTTP route handlers.

pub mod basket;
pub mod health;
pub mod metrics;
pub mod payment;
pub mod products;

use ::basket::Session;
use axum::http::HeaderMap;

use crate::AppState;
use crate::error::ApiError;

/// Header carrying the authenticated principal name, when the transport
/// layer vouches for one.
pub(crate) const PRINCIPAL_HEADER: &str = "x-principal";

/// Extracts the client session from request headers.
///
/// The session id header is mandatory on every session-bound route; the
/// principal header is optional and only consulted the first time a
/// session id is seen.
pub(crate) async fn load_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(String, Session), ApiError> {
    let session_id = headers
        .get(state.session_header.as_str())
        .and_then(|value| value.to_str().ok())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("Missing {} header", state.session_header)))?
        .to_string();

    let principal = headers
        .get(PRINCIPAL_HEADER)
        .and_then(|value| value.to_str().ok());

    let session = state.sessions.load(&session_id, principal).await;
    Ok((session_id, session))
}
