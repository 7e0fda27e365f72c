//! Report endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::DelinquentWorker};

/// Workers holding overdue tools
#[utoipa::path(
    get,
    path = "/reports/delinquents",
    tag = "reports",
    responses(
        (status = 200, description = "Workers with overdue loans, oldest debt first", body = Vec<DelinquentWorker>)
    )
)]
pub async fn delinquent_workers(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<DelinquentWorker>>> {
    let report = state.services.reports.delinquents().await?;
    Ok(Json(report))
}
