//! Delinquency report types

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Item still out on an overdue loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PendingItem {
    pub loan_id: i32,
    pub item_id: i32,
    pub name: String,
    pub quantity_borrowed: i32,
    pub quantity_returned_total: i32,
    pub pending: i32,
    pub detail_note: String,
    pub loaned_at: DateTime<Utc>,
    pub days_late: i64,
}

/// Worker holding at least one overdue loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DelinquentWorker {
    pub worker_id: i32,
    pub code: Option<String>,
    pub name: Option<String>,
    pub pending_items: Vec<PendingItem>,
    pub total_pending: i64,
    pub oldest_loan_at: DateTime<Utc>,
}
