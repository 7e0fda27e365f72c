//! Tool loan model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::worker::Worker;

/// Loan status.
///
/// Only `Pending`, `InProgress` and `Completed` are ever reached through a
/// transition; `Overdue` is an overlay computed at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Pending,
    InProgress,
    Completed,
    Overdue,
}

impl LoanStatus {
    /// Statuses of loans that still have tools out
    pub const OPEN: [LoanStatus; 3] = [LoanStatus::Pending, LoanStatus::InProgress, LoanStatus::Overdue];
}

/// One product line within a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanItem {
    pub id: i32,
    /// Product name at loan time
    pub name: String,
    pub product_id: Option<i32>,
    pub quantity_borrowed: i32,
    /// Cumulative quantity returned across all return events
    pub quantity_returned_total: i32,
    /// Identifies the physical tool among identical variants
    pub detail_note: String,
}

impl LoanItem {
    pub fn remaining(&self) -> i32 {
        (self.quantity_borrowed - self.quantity_returned_total).max(0)
    }

    pub fn is_fully_returned(&self) -> bool {
        self.quantity_returned_total >= self.quantity_borrowed
    }
}

/// Loan as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: i32,
    pub worker_id: i32,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Last status written by the backend; see `lifecycle::overdue::project`
    pub status: LoanStatus,
    pub notes: Option<String>,
    pub items: Vec<LoanItem>,
    /// Embedded worker when the backend includes it
    pub worker: Option<Worker>,
}

impl Loan {
    pub fn is_fully_returned(&self) -> bool {
        self.items.iter().all(LoanItem::is_fully_returned)
    }

    pub fn total_borrowed(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity_borrowed)).sum()
    }

    pub fn total_returned(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity_returned_total)).sum()
    }

    pub fn item(&self, item_id: i32) -> Option<&LoanItem> {
        self.items.iter().find(|i| i.id == item_id)
    }
}

/// Line of a loan about to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLoanItem {
    pub name: String,
    pub product_id: Option<i32>,
    pub quantity_borrowed: i32,
    pub detail_note: String,
}

/// Validated loan ready to be submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLoan {
    pub worker_id: i32,
    pub status: LoanStatus,
    pub notes: Option<String>,
    pub items: Vec<NewLoanItem>,
}

/// Create loan request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLoan {
    /// Borrowing worker
    pub worker_id: Option<i32>,
    #[validate(nested)]
    pub items: Vec<CreateLoanLine>,
    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Requested line of a new loan
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLoanLine {
    /// Catalog product; omit for a freeform line
    pub product_id: Option<i32>,
    /// Label for freeform lines (catalog lines use the product name)
    pub name: Option<String>,
    pub quantity: i32,
    #[validate(length(max = 255, message = "Detail note must be at most 255 characters"))]
    pub detail_note: Option<String>,
}

/// Quantity handed back for one item in a return event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub struct ReturnEntry {
    pub item_id: i32,
    /// Amount returned in this event, not cumulative
    pub quantity_returned_now: i32,
    /// Cumulative returned quantity the caller was looking at; must match
    /// the current total or the event is refused as stale
    pub returned_total_seen: i32,
}

/// Return event request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecordReturn {
    pub entries: Vec<ReturnEntry>,
}

/// Cumulative totals of one item after a return event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnedItemTotals {
    pub item_id: i32,
    pub quantity_returned_total: i32,
    pub previous_returned_total: i32,
    pub quantity_borrowed: i32,
}

/// What the backend must persist for a return event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnSubmission {
    pub items: Vec<ReturnedItemTotals>,
    pub close_loan: bool,
    pub status: LoanStatus,
}

/// Loan item as shown to staff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LoanItemView {
    pub id: i32,
    pub name: String,
    pub product_id: Option<i32>,
    pub quantity_borrowed: i32,
    pub quantity_returned_total: i32,
    pub remaining: i32,
    pub detail_note: String,
}

/// Loan with status recomputed at read time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LoanView {
    pub id: i32,
    pub worker_id: i32,
    pub worker_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub days_late: i64,
    pub is_overdue: bool,
    /// Every item is fully returned
    pub can_close: bool,
    pub notes: Option<String>,
    pub items: Vec<LoanItemView>,
}

impl From<&LoanItem> for LoanItemView {
    fn from(item: &LoanItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            product_id: item.product_id,
            quantity_borrowed: item.quantity_borrowed,
            quantity_returned_total: item.quantity_returned_total,
            remaining: item.remaining(),
            detail_note: item.detail_note.clone(),
        }
    }
}
