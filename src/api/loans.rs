//! Loan management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        loan::{CreateLoan, RecordReturn},
        LoanView,
    },
};

use super::PaginatedResponse;

/// Open loan query parameters
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
pub struct OpenLoansQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub per_page: Option<u32>,
}

/// Created loan with a status message
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    /// Status message
    pub message: String,
    pub loan: LoanView,
}

/// Result of a return event
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// `completed` when the loan closed, `partial` otherwise
    pub status: String,
    /// Status message
    pub message: String,
    pub loan: LoanView,
}

/// List loans with tools still out
#[utoipa::path(
    get,
    path = "/loans/open",
    tag = "loans",
    params(OpenLoansQuery),
    responses(
        (status = 200, description = "Open loans, oldest first", body = PaginatedResponse<LoanView>),
        (status = 503, description = "Inventory backend unreachable", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_open_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<OpenLoansQuery>,
) -> AppResult<Json<PaginatedResponse<LoanView>>> {
    query.validate()?;

    let loans = &state.services.loans;
    let page = loans
        .list_open(loans.page_request(query.page, query.per_page))
        .await?;

    Ok(Json(page.into()))
}

/// Get loan details by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = LoanView),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<LoanView>> {
    let loan = state.services.loans.get(loan_id).await?;
    Ok(Json(loan))
}

/// Create a new loan
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanResponse),
        (status = 400, description = "Invalid request or not enough stock", body = crate::error::ErrorResponse),
        (status = 404, description = "Worker or product not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanResponse>)> {
    let loan = state.services.loans.create(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(LoanResponse {
            message: "Loan created".to_string(),
            loan,
        }),
    ))
}

/// Record a (possibly partial) return
#[utoipa::path(
    post,
    path = "/loans/{id}/returns",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = RecordReturn,
    responses(
        (status = 200, description = "Return recorded", body = ReturnResponse),
        (status = 400, description = "Invalid return quantities", body = crate::error::ErrorResponse),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Loan already completed or changed since it was read", body = crate::error::ErrorResponse)
    )
)]
pub async fn record_return(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
    Json(request): Json<RecordReturn>,
) -> AppResult<Json<ReturnResponse>> {
    let result = state
        .services
        .loans
        .record_return(loan_id, &request.entries)
        .await?;

    let (status, message) = if result.completed {
        ("completed", "Loan completed")
    } else {
        ("partial", "Return recorded")
    };

    Ok(Json(ReturnResponse {
        status: status.to_string(),
        message: message.to_string(),
        loan: result.loan,
    }))
}
