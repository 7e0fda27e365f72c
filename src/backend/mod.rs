//! Gateway to the remote inventory backend
//!
//! The backend owns persistence for workers, products and loans. Everything
//! in this crate reads and writes through [`InventoryBackend`].

pub mod http;
pub mod wire;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    loan::{NewLoan, ReturnSubmission},
    Loan, LoanStatus, Product, ProductSearch, Worker,
};

pub use http::HttpBackend;

/// Errors talking to the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// No response at all (connection refused, timeout, DNS...)
    #[error("backend transport error: {0}")]
    Transport(String),

    /// Non-success response; `message` is the backend's own text
    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("backend payload error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// Read and write operations the backend of record provides
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryBackend: Send + Sync {
    /// List workers, optionally only active (`Some(true)`) or inactive ones
    async fn list_workers(&self, active: Option<bool>) -> Result<Vec<Worker>, BackendError>;

    async fn get_worker(&self, id: i32) -> Result<Worker, BackendError>;

    /// List products matching the backend-side search
    async fn list_products(&self, search: &ProductSearch) -> Result<Vec<Product>, BackendError>;

    async fn get_product(&self, id: i32) -> Result<Product, BackendError>;

    /// List loans in any of `statuses`, items included
    async fn list_loans(&self, statuses: &[LoanStatus]) -> Result<Vec<Loan>, BackendError>;

    async fn get_loan(&self, id: i32) -> Result<Loan, BackendError>;

    /// Create a loan; the backend assigns ids and the start date
    async fn create_loan(&self, loan: &NewLoan) -> Result<Loan, BackendError>;

    /// Persist the cumulative totals and resulting status of a return event.
    /// `Ok` is the backend's acknowledgment; nothing counts as saved before it.
    async fn submit_return(
        &self,
        loan_id: i32,
        submission: &ReturnSubmission,
    ) -> Result<(), BackendError>;
}
