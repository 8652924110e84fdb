//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use basket::BasketError;
use checkout::CheckoutError;
use domain::OrderError;
use stores::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Basket mutation error.
    Basket(BasketError),
    /// Checkout or payment commit error.
    Checkout(CheckoutError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Basket(err) => basket_error_to_response(err),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn basket_error_to_response(err: BasketError) -> (StatusCode, String) {
    match &err {
        BasketError::InvalidQuantity(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        BasketError::ProductNotFound(_) | BasketError::LineNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        BasketError::InsufficientStock { .. } => (StatusCode::CONFLICT, err.to_string()),
        BasketError::Store(_) => {
            tracing::error!(error = %err, "basket store failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    if let CheckoutError::Basket(inner) = err {
        return basket_error_to_response(inner);
    }

    let status = match &err {
        CheckoutError::Order(OrderError::AlreadyCompleted(_))
        | CheckoutError::Store(StoreError::OrderAlreadyCompleted(_))
        | CheckoutError::Store(StoreError::InsufficientStock { .. })
        | CheckoutError::PriceUnavailable(_) => StatusCode::CONFLICT,
        CheckoutError::PaymentDeclined(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "checkout failure");
    } else if status == StatusCode::BAD_GATEWAY {
        tracing::warn!(error = %err, "payment authorization failed");
    }

    (status, err.to_string())
}

impl From<BasketError> for ApiError {
    fn from(err: BasketError) -> Self {
        ApiError::Basket(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}
