//! Partial return reconciliation

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::LoanRuleError;
use crate::models::{
    loan::{ReturnEntry, ReturnSubmission, ReturnedItemTotals},
    Loan, LoanStatus,
};

/// Reject entries built from an older view of the loan than `loan`
pub fn ensure_fresh(loan: &Loan, entries: &[ReturnEntry]) -> Result<(), LoanRuleError> {
    for entry in entries {
        // Unknown items are reported by `record_return`
        let Some(item) = loan.item(entry.item_id) else {
            continue;
        };
        if entry.returned_total_seen != item.quantity_returned_total {
            return Err(LoanRuleError::StaleSnapshot(item.name.clone()));
        }
    }
    Ok(())
}

impl Loan {
    /// Apply one return event.
    ///
    /// The whole batch is validated before any item is touched, so on error
    /// the loan is unchanged. On success the returned submission carries the
    /// new cumulative totals of every item that moved.
    pub fn record_return(
        &mut self,
        entries: &[ReturnEntry],
        at: DateTime<Utc>,
    ) -> Result<ReturnSubmission, LoanRuleError> {
        if self.completed_at.is_some() || self.is_fully_returned() {
            return Err(LoanRuleError::AlreadyCompleted);
        }

        // item index -> quantity returned now, widened so no sum can overflow
        let mut deltas: IndexMap<usize, i64> = IndexMap::new();
        for entry in entries {
            let index = self
                .items
                .iter()
                .position(|i| i.id == entry.item_id)
                .ok_or(LoanRuleError::UnknownItem(entry.item_id))?;
            let item = &self.items[index];

            if entry.quantity_returned_now < 0 {
                return Err(LoanRuleError::InvalidReturnQuantity(item.name.clone()));
            }

            let delta = deltas.entry(index).or_insert(0);
            *delta += i64::from(entry.quantity_returned_now);

            if i64::from(item.quantity_returned_total) + *delta > i64::from(item.quantity_borrowed) {
                return Err(LoanRuleError::InvalidReturnQuantity(item.name.clone()));
            }
        }

        if deltas.values().all(|d| *d == 0) {
            return Err(LoanRuleError::EmptyReturn);
        }

        let mut totals = Vec::new();
        for (index, delta) in deltas {
            if delta == 0 {
                continue;
            }
            let item = &mut self.items[index];
            let previous = item.quantity_returned_total;
            // previous + delta <= quantity_borrowed was checked above, so this fits in i32
            item.quantity_returned_total = previous + delta as i32;
            totals.push(ReturnedItemTotals {
                item_id: item.id,
                quantity_returned_total: item.quantity_returned_total,
                previous_returned_total: previous,
                quantity_borrowed: item.quantity_borrowed,
            });
        }

        let close_loan = self.is_fully_returned();
        if close_loan {
            self.status = LoanStatus::Completed;
            self.completed_at = Some(at);
        } else {
            self.status = LoanStatus::InProgress;
        }

        Ok(ReturnSubmission {
            items: totals,
            close_loan,
            status: self.status,
        })
    }
}
