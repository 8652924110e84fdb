//! HTTP API server with observability for the basket-checkout system.
//!
//! Provides REST endpoints for the catalog, basket mutations, checkout,
//! and payment, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
mod session;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use checkout::{CheckoutEngine, InMemoryPaymentGateway};
use domain::{Money, Product};
use metrics_exporter_prometheus::PrometheusHandle;
use stores::{InMemoryBasketStore, InMemoryCatalog, InMemoryOrderStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use session::SessionRegistry;

/// The engine wiring the server runs on.
pub type Engine = CheckoutEngine<
    InMemoryCatalog,
    InMemoryBasketStore,
    InMemoryOrderStore,
    InMemoryPaymentGateway,
>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub engine: Engine,
    pub catalog: InMemoryCatalog,
    pub orders: InMemoryOrderStore,
    pub gateway: InMemoryPaymentGateway,
    pub sessions: SessionRegistry,
    pub session_header: String,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", get(routes::products::list))
        .route("/products/{id}", get(routes::products::get))
        .route(
            "/basket",
            get(routes::basket::get).delete(routes::basket::clear),
        )
        .route(
            "/basket/items",
            post(routes::basket::add_items).delete(routes::basket::remove_items),
        )
        .route("/checkout", post(routes::payment::checkout))
        .route("/pay", post(routes::payment::pay))
        .route("/order", get(routes::payment::get_order))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over in-memory stores.
pub fn create_default_state(catalog: InMemoryCatalog, session_header: &str) -> Arc<AppState> {
    let basket_store = InMemoryBasketStore::new();
    let orders = InMemoryOrderStore::new();
    let gateway = InMemoryPaymentGateway::new();

    let engine = CheckoutEngine::new(
        catalog.clone(),
        basket_store,
        orders.clone(),
        gateway.clone(),
    );

    Arc::new(AppState {
        engine,
        catalog,
        orders,
        gateway,
        sessions: SessionRegistry::new(),
        session_header: session_header.to_string(),
    })
}

/// Builds the beverage catalog the server starts with.
pub fn seed_catalog() -> InMemoryCatalog {
    InMemoryCatalog::with_products(vec![
        Product::new("AA1ITC", "Italian Coffee", Money::from_cents(110), 10),
        Product::new("AA2AMC", "American Coffee", Money::from_cents(220), 15),
        Product::new("BB2TEA", "Tea", Money::from_cents(300), 1)
            .with_description("Loose-leaf black tea"),
        Product::new("C1CCHC", "Chocolate", Money::from_cents(350), 17)
            .with_description("Hot chocolate"),
    ])
}
