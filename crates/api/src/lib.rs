//! HTTP API layer with Axum routes.
//!
//! Thin handlers over the repositories: parse the request, call the
//! repository or the core service, translate errors through
//! [`error::ApiError`]. No business logic lives here.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ledgerbook_core::fx::RateSource;
use ledgerbook_shared::types::Currency;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// The book's base (reporting) currency.
    pub base_currency: Currency,
    /// External FX rate source.
    pub rate_source: Arc<dyn RateSource>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
