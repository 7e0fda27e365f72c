//! Worker endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{worker::WorkerQuery, Worker, WorkerFilter},
};

use super::PaginatedResponse;

/// List workers
#[utoipa::path(
    get,
    path = "/workers",
    tag = "workers",
    params(WorkerQuery),
    responses(
        (status = 200, description = "List of workers", body = PaginatedResponse<Worker>),
        (status = 400, description = "Invalid query", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_workers(
    State(state): State<crate::AppState>,
    Query(query): Query<WorkerQuery>,
) -> AppResult<Json<PaginatedResponse<Worker>>> {
    query.validate()?;

    let workers = &state.services.workers;
    let page = workers
        .list(
            &WorkerFilter::from(&query),
            workers.page_request(query.page, query.per_page),
        )
        .await?;

    Ok(Json(page.into()))
}
