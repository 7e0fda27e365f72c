//! API handlers for Stockroom REST endpoints

pub mod health;
pub mod loans;
pub mod openapi;
pub mod products;
pub mod reports;
pub mod workers;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{models::Page, AppState};

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Items on this page
    pub items: Vec<T>,
    /// Total number of matching items
    pub total: usize,
    /// Current page number
    pub page: u32,
    /// Items per page
    pub per_page: u32,
    pub total_pages: usize,
}

impl<T> From<Page<T>> for PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    fn from(page: Page<T>) -> Self {
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Workers
        .route("/workers", get(workers::list_workers))
        // Products
        .route("/products", get(products::list_products))
        .route("/products/dashboard", get(products::inventory_dashboard))
        // Loans
        .route("/loans", post(loans::create_loan))
        .route("/loans/open", get(loans::list_open_loans))
        .route("/loans/:id", get(loans::get_loan))
        .route("/loans/:id/returns", post(loans::record_return))
        // Reports
        .route("/reports/delinquents", get(reports::delinquent_workers))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
