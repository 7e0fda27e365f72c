//! Data models for Stockroom

pub mod loan;
pub mod pagination;
pub mod product;
pub mod report;
pub mod text;
pub mod worker;

// Re-export commonly used types
pub use loan::{Loan, LoanItem, LoanStatus, LoanView};
pub use pagination::{Page, PageRequest};
pub use product::{Product, ProductFilter, ProductSearch};
pub use report::DelinquentWorker;
pub use worker::{Worker, WorkerFilter};
