//! Error types for Stockroom server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{backend::BackendError, lifecycle::LoanRuleError};

/// Application error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    BadValue = 2,
    NoSuchData = 3,
    NoWorkerSelected = 4,
    WorkerInactive = 5,
    NoItems = 6,
    InvalidQuantity = 7,
    InsufficientStock = 8,
    InvalidReturnQuantity = 9,
    EmptyReturn = 10,
    LoanCompleted = 11,
    StaleLoan = 12,
    BackendUnavailable = 13,
    BackendRejected = 14,
    MissingItemName = 15,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A loan lifecycle rule was violated before anything was sent to the backend
    #[error(transparent)]
    Rule(#[from] LoanRuleError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The backend could not be reached at all
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend answered with a non-success status
    #[error("Backend rejected the request ({status}): {message}")]
    BackendRejected { status: u16, message: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Transport(msg) => AppError::BackendUnavailable(msg),
            BackendError::Rejected { status: 404, message } => AppError::NotFound(message),
            BackendError::Rejected { status, message } => {
                AppError::BackendRejected { status, message }
            }
            BackendError::Decode(msg) => {
                AppError::Internal(format!("Unexpected backend payload: {}", msg))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

fn rule_status(err: &LoanRuleError) -> (StatusCode, ErrorCode) {
    match err {
        LoanRuleError::NoWorkerSelected => (StatusCode::BAD_REQUEST, ErrorCode::NoWorkerSelected),
        LoanRuleError::WorkerInactive(_) => (StatusCode::BAD_REQUEST, ErrorCode::WorkerInactive),
        LoanRuleError::NoItems => (StatusCode::BAD_REQUEST, ErrorCode::NoItems),
        LoanRuleError::InvalidQuantity(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidQuantity),
        LoanRuleError::MissingItemName => (StatusCode::BAD_REQUEST, ErrorCode::MissingItemName),
        LoanRuleError::InsufficientStock { .. } => {
            (StatusCode::BAD_REQUEST, ErrorCode::InsufficientStock)
        }
        LoanRuleError::InvalidReturnQuantity(_) | LoanRuleError::UnknownItem(_) => {
            (StatusCode::BAD_REQUEST, ErrorCode::InvalidReturnQuantity)
        }
        LoanRuleError::EmptyReturn => (StatusCode::BAD_REQUEST, ErrorCode::EmptyReturn),
        LoanRuleError::AlreadyCompleted => (StatusCode::CONFLICT, ErrorCode::LoanCompleted),
        LoanRuleError::StaleSnapshot(_) => (StatusCode::CONFLICT, ErrorCode::StaleLoan),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Rule(rule) => {
                let (status, code) = rule_status(rule);
                (status, code, rule.to_string())
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::BackendUnavailable(msg) => {
                tracing::error!("Backend unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorCode::BackendUnavailable,
                    format!(
                        "Could not reach the inventory backend ({}). Please try again.",
                        msg
                    ),
                )
            }
            AppError::BackendRejected { status, message } => {
                tracing::warn!("Backend rejected request with status {}: {}", status, message);
                let status = match *status {
                    400 | 409 | 422 => {
                        StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                    }
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, ErrorCode::BackendRejected, message.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
