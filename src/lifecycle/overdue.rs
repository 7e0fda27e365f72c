//! Read-time status projection

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::OVERDUE_GRACE_DAYS;
use crate::models::{loan::LoanItemView, Loan, LoanStatus, LoanView};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverdueState {
    pub days_late: i64,
    pub is_overdue: bool,
}

/// Whole days since `created_at`, rounded up; never negative
pub fn days_late(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed = (now - created_at).num_milliseconds();
    if elapsed <= 0 {
        return 0;
    }
    elapsed / MILLIS_PER_DAY + i64::from(elapsed % MILLIS_PER_DAY != 0)
}

pub fn compute_overdue_state(loan: &Loan, now: DateTime<Utc>) -> OverdueState {
    let days_late = days_late(loan.created_at, now);
    OverdueState {
        days_late,
        is_overdue: days_late > OVERDUE_GRACE_DAYS && !loan.is_fully_returned(),
    }
}

/// Status implied by item totals alone, ignoring whatever the backend stored
pub fn underlying_status(loan: &Loan) -> LoanStatus {
    if loan.is_fully_returned() {
        LoanStatus::Completed
    } else if loan.items.iter().any(|i| i.quantity_returned_total > 0) {
        LoanStatus::InProgress
    } else {
        LoanStatus::Pending
    }
}

/// Recompute the displayed status of `loan` as of `now`
pub fn project(loan: &Loan, now: DateTime<Utc>) -> LoanView {
    let overdue = compute_overdue_state(loan, now);
    let status = if overdue.is_overdue {
        LoanStatus::Overdue
    } else {
        underlying_status(loan)
    };

    if status != loan.status && loan.status != LoanStatus::Overdue {
        tracing::debug!(
            "Loan {} stored as {:?}, projected as {:?}",
            loan.id,
            loan.status,
            status
        );
    }

    LoanView {
        id: loan.id,
        worker_id: loan.worker_id,
        worker_name: loan.worker.as_ref().map(|w| w.name.clone()),
        created_at: loan.created_at,
        completed_at: loan.completed_at,
        status,
        days_late: overdue.days_late,
        is_overdue: overdue.is_overdue,
        can_close: loan.is_fully_returned(),
        notes: loan.notes.clone(),
        items: loan.items.iter().map(LoanItemView::from).collect(),
    }
}
