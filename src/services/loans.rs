//! Loan management service

use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use validator::Validate;

use crate::{
    backend::{BackendError, InventoryBackend},
    error::{AppError, AppResult},
    lifecycle::{self, RequestedItem},
    models::{
        loan::{CreateLoan, ReturnEntry},
        LoanStatus, LoanView, Page, PageRequest, Product,
    },
};

/// Outcome of a recorded return event
#[derive(Debug, Clone)]
pub struct ReturnResult {
    pub loan: LoanView,
    /// The event closed the loan
    pub completed: bool,
}

#[derive(Clone)]
pub struct LoansService {
    backend: Arc<dyn InventoryBackend>,
    per_page: u32,
}

/// Give 404s from the backend a message naming what was missing
fn missing(what: &str, id: i32) -> impl FnOnce(BackendError) -> AppError + '_ {
    move |err| match err {
        BackendError::Rejected { status: 404, .. } => {
            AppError::NotFound(format!("{} with id {} not found", what, id))
        }
        other => other.into(),
    }
}

impl LoansService {
    pub fn new(backend: Arc<dyn InventoryBackend>, per_page: u32) -> Self {
        Self { backend, per_page }
    }

    pub fn page_request(&self, page: Option<u32>, per_page: Option<u32>) -> PageRequest {
        PageRequest::new(page, per_page, self.per_page)
    }

    /// Loans with tools still out, oldest first, with status recomputed now
    pub async fn list_open(&self, page: PageRequest) -> AppResult<Page<LoanView>> {
        let now = Utc::now();
        let loans = self.backend.list_loans(&LoanStatus::OPEN).await?;

        let mut views: Vec<LoanView> = loans
            .iter()
            .map(|loan| lifecycle::project(loan, now))
            .filter(|view| view.status != LoanStatus::Completed)
            .collect();
        views.sort_by_key(|view| (view.created_at, view.id));

        Ok(page.paginate(views))
    }

    /// Get a single loan with its current status
    pub async fn get(&self, loan_id: i32) -> AppResult<LoanView> {
        let loan = self
            .backend
            .get_loan(loan_id)
            .await
            .map_err(missing("Loan", loan_id))?;
        Ok(lifecycle::project(&loan, Utc::now()))
    }

    /// Validate and create a new loan
    pub async fn create(&self, request: &CreateLoan) -> AppResult<LoanView> {
        request.validate()?;
        // Nothing to look up yet: reject before touching the backend
        lifecycle::ensure_request_shape(request.worker_id.is_some(), request.items.len())?;
        let worker_id = request
            .worker_id
            .ok_or(lifecycle::LoanRuleError::NoWorkerSelected)?;

        let worker = self
            .backend
            .get_worker(worker_id)
            .await
            .map_err(missing("Worker", worker_id))?;

        // Current stock for every distinct product in the request
        let mut products: IndexMap<i32, Product> = IndexMap::new();
        for product_id in request.items.iter().filter_map(|line| line.product_id) {
            if products.contains_key(&product_id) {
                continue;
            }
            let product = self
                .backend
                .get_product(product_id)
                .await
                .map_err(missing("Product", product_id))?;
            products.insert(product_id, product);
        }

        let requested: Vec<RequestedItem<'_>> = request
            .items
            .iter()
            .map(|line| RequestedItem {
                product: line.product_id.and_then(|id| products.get(&id)),
                name: line.name.clone(),
                quantity: line.quantity,
                detail_note: line.detail_note.clone(),
            })
            .collect();

        let new_loan = lifecycle::create_loan(Some(&worker), &requested, request.notes.clone())
            .map_err(|err| {
                tracing::warn!("Loan request for worker {} rejected: {}", worker_id, err);
                err
            })?;

        let created = self.backend.create_loan(&new_loan).await?;
        tracing::info!(
            "Loan {} created for worker {} with {} item(s)",
            created.id,
            worker_id,
            created.items.len()
        );

        Ok(lifecycle::project(&created, Utc::now()))
    }

    /// Record a return event against the latest server state of the loan.
    ///
    /// The loan is re-fetched first so a submission built from an outdated
    /// view is refused. The updated loan is only reported once the backend
    /// acknowledges the write.
    pub async fn record_return(
        &self,
        loan_id: i32,
        entries: &[ReturnEntry],
    ) -> AppResult<ReturnResult> {
        let mut loan = self
            .backend
            .get_loan(loan_id)
            .await
            .map_err(missing("Loan", loan_id))?;

        if let Err(err) = lifecycle::ensure_fresh(&loan, entries) {
            tracing::warn!("Stale return submission for loan {}: {}", loan_id, err);
            return Err(err.into());
        }

        let at = Utc::now();
        let submission = loan.record_return(entries, at).map_err(|err| {
            tracing::warn!("Return on loan {} rejected: {}", loan_id, err);
            err
        })?;

        if let Err(err) = self.backend.submit_return(loan_id, &submission).await {
            tracing::warn!("Return on loan {} not acknowledged: {}", loan_id, err);
            return Err(err.into());
        }

        tracing::info!(
            "Return recorded on loan {} ({} item(s), status {:?})",
            loan_id,
            submission.items.len(),
            submission.status
        );

        Ok(ReturnResult {
            loan: lifecycle::project(&loan, at),
            completed: submission.close_loan,
        })
    }
}
