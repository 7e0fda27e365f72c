//! Product catalog endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        product::{InventoryDashboard, ProductQuery},
        Product, ProductFilter,
    },
};

use super::PaginatedResponse;

/// Dashboard query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DashboardQuery {
    /// Narrow the alert list by code or name
    pub search: Option<String>,
}

/// List products with search and pagination
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(ProductQuery),
    responses(
        (status = 200, description = "List of products", body = PaginatedResponse<Product>),
        (status = 400, description = "Invalid query", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_products(
    State(state): State<crate::AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<PaginatedResponse<Product>>> {
    query.validate()?;
    if let (Some(min), Some(max)) = (query.min_quantity, query.max_quantity) {
        if min > max {
            return Err(AppError::BadRequest(
                "min_quantity cannot be greater than max_quantity".to_string(),
            ));
        }
    }

    let catalog = &state.services.catalog;
    let filter = ProductFilter::from(&query);
    let page = catalog
        .list_products(&filter, catalog.page_request(query.page, query.per_page))
        .await?;

    Ok(Json(page.into()))
}

/// Inventory summary with stock alerts
#[utoipa::path(
    get,
    path = "/products/dashboard",
    tag = "products",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Inventory dashboard", body = InventoryDashboard)
    )
)]
pub async fn inventory_dashboard(
    State(state): State<crate::AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<InventoryDashboard>> {
    let dashboard = state
        .services
        .catalog
        .dashboard(query.search.as_deref())
        .await?;
    Ok(Json(dashboard))
}
