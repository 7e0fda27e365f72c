//! Delinquency report

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::{
    backend::InventoryBackend,
    error::AppResult,
    lifecycle,
    models::{report::PendingItem, DelinquentWorker, Loan, LoanStatus, Worker},
};

#[derive(Clone)]
pub struct ReportsService {
    backend: Arc<dyn InventoryBackend>,
}

impl ReportsService {
    pub fn new(backend: Arc<dyn InventoryBackend>) -> Self {
        Self { backend }
    }

    /// Workers with overdue loans, as of now
    pub async fn delinquents(&self) -> AppResult<Vec<DelinquentWorker>> {
        let loans = self.backend.list_loans(&LoanStatus::OPEN).await?;
        let workers = self.backend.list_workers(None).await?;

        let report = build_delinquency_report(&loans, &workers, Utc::now());
        tracing::debug!("Delinquency report: {} worker(s)", report.len());
        Ok(report)
    }
}

/// Group the items still out on overdue loans by worker, oldest debt first
pub fn build_delinquency_report(
    loans: &[Loan],
    workers: &[Worker],
    now: DateTime<Utc>,
) -> Vec<DelinquentWorker> {
    let mut by_worker: IndexMap<i32, DelinquentWorker> = IndexMap::new();

    for loan in loans {
        let state = lifecycle::compute_overdue_state(loan, now);
        if !state.is_overdue {
            continue;
        }

        let pending: Vec<PendingItem> = loan
            .items
            .iter()
            .filter(|item| item.remaining() > 0)
            .map(|item| PendingItem {
                loan_id: loan.id,
                item_id: item.id,
                name: item.name.clone(),
                quantity_borrowed: item.quantity_borrowed,
                quantity_returned_total: item.quantity_returned_total,
                pending: item.remaining(),
                detail_note: item.detail_note.clone(),
                loaned_at: loan.created_at,
                days_late: state.days_late,
            })
            .collect();
        if pending.is_empty() {
            continue;
        }

        let entry = by_worker.entry(loan.worker_id).or_insert_with(|| {
            let worker = loan
                .worker
                .as_ref()
                .or_else(|| workers.iter().find(|w| w.id == loan.worker_id));
            DelinquentWorker {
                worker_id: loan.worker_id,
                code: worker.map(|w| w.code.clone()),
                name: worker.map(|w| w.name.clone()),
                pending_items: Vec::new(),
                total_pending: 0,
                oldest_loan_at: loan.created_at,
            }
        });

        entry.total_pending += pending.iter().map(|p| i64::from(p.pending)).sum::<i64>();
        entry.oldest_loan_at = entry.oldest_loan_at.min(loan.created_at);
        entry.pending_items.extend(pending);
    }

    let mut report: Vec<DelinquentWorker> = by_worker.into_values().collect();
    report.sort_by_key(|w| (w.oldest_loan_at, w.worker_id));
    report
}
