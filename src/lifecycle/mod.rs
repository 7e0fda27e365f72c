//! Tool loan lifecycle rules
//!
//! Everything in here is pure: functions take the loan state and the current
//! time and either return a new state or a [`LoanRuleError`]. Nothing is sent
//! to the backend from this module.
//!
//! ```text
//! pending -----> in_progress -----> completed
//!    \                                  ^
//!     \------- overdue (overlay) -------/
//! ```

pub mod draft;
pub mod overdue;
pub mod returns;

use rust_decimal::Decimal;
use thiserror::Error;

pub use draft::{create_loan, ensure_request_shape, RequestedItem};
pub use overdue::{compute_overdue_state, days_late, project, underlying_status, OverdueState};
pub use returns::ensure_fresh;

/// Days after creation before an incomplete loan counts as overdue
pub const OVERDUE_GRACE_DAYS: i64 = 2;

/// User-correctable violations of the loan rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanRuleError {
    #[error("No worker selected")]
    NoWorkerSelected,

    #[error("Worker {0} is inactive")]
    WorkerInactive(String),

    #[error("The loan must contain at least one item")]
    NoItems,

    #[error("Quantity for {0} must be greater than zero")]
    InvalidQuantity(String),

    #[error("Freeform loan items need a name")]
    MissingItemName,

    #[error("Not enough stock for {name}. Available quantity: {available}")]
    InsufficientStock { name: String, available: Decimal },

    #[error("Invalid return quantity for {0}")]
    InvalidReturnQuantity(String),

    #[error("At least one return quantity must be greater than zero")]
    EmptyReturn,

    #[error("Item {0} does not belong to this loan")]
    UnknownItem(i32),

    #[error("Loan is already completed")]
    AlreadyCompleted,

    #[error("Returned quantity for {0} changed since it was displayed; reload the loan and try again")]
    StaleSnapshot(String),
}
