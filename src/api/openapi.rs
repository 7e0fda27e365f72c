//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, loans, products, reports, workers};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockroom API",
        version = "1.0.0",
        description = "Warehouse tool loan and inventory REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Workers
        workers::list_workers,
        // Products
        products::list_products,
        products::inventory_dashboard,
        // Loans
        loans::list_open_loans,
        loans::get_loan,
        loans::create_loan,
        loans::record_return,
        // Reports
        reports::delinquent_workers,
    ),
    components(
        schemas(
            // Workers
            crate::models::worker::Worker,
            // Products
            crate::models::product::Product,
            crate::models::product::InventoryDashboard,
            crate::models::product::QuantityEntry,
            // Loans
            crate::models::loan::LoanStatus,
            crate::models::loan::LoanView,
            crate::models::loan::LoanItemView,
            crate::models::loan::CreateLoan,
            crate::models::loan::CreateLoanLine,
            crate::models::loan::RecordReturn,
            crate::models::loan::ReturnEntry,
            loans::LoanResponse,
            loans::ReturnResponse,
            // Reports
            crate::models::report::DelinquentWorker,
            crate::models::report::PendingItem,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "workers", description = "Worker directory"),
        (name = "products", description = "Product catalog and stock alerts"),
        (name = "loans", description = "Tool loans and returns"),
        (name = "reports", description = "Delinquency reports")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
