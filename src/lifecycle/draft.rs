//! Loan creation rules

use indexmap::IndexMap;
use rust_decimal::Decimal;

use super::LoanRuleError;
use crate::models::{
    loan::{NewLoan, NewLoanItem},
    LoanStatus, Product, Worker,
};

/// One requested line, with the product resolved against current stock
#[derive(Debug, Clone)]
pub struct RequestedItem<'a> {
    pub product: Option<&'a Product>,
    /// Used for freeform lines only
    pub name: Option<String>,
    pub quantity: i32,
    pub detail_note: Option<String>,
}

/// Checks that need no data from the backend
pub fn ensure_request_shape(worker_selected: bool, line_count: usize) -> Result<(), LoanRuleError> {
    if !worker_selected {
        return Err(LoanRuleError::NoWorkerSelected);
    }
    if line_count == 0 {
        return Err(LoanRuleError::NoItems);
    }
    Ok(())
}

/// Validate a borrow request and build the loan to submit.
///
/// Lines naming the same product are checked against stock as one combined
/// quantity, but stay separate lines so their detail notes survive.
pub fn create_loan(
    worker: Option<&Worker>,
    requested: &[RequestedItem<'_>],
    notes: Option<String>,
) -> Result<NewLoan, LoanRuleError> {
    ensure_request_shape(worker.is_some(), requested.len())?;
    let worker = worker.ok_or(LoanRuleError::NoWorkerSelected)?;

    if !worker.active {
        return Err(LoanRuleError::WorkerInactive(worker.name.clone()));
    }

    let mut per_product: IndexMap<i32, (&Product, i64)> = IndexMap::new();
    let mut items = Vec::with_capacity(requested.len());

    for line in requested {
        let name = match line.product {
            Some(product) => product.name.clone(),
            None => line
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or(LoanRuleError::MissingItemName)?
                .to_string(),
        };

        if line.quantity <= 0 {
            return Err(LoanRuleError::InvalidQuantity(name));
        }

        if let Some(product) = line.product {
            per_product.entry(product.id).or_insert((product, 0)).1 += i64::from(line.quantity);
        }

        let detail_note = match line.detail_note.as_deref().map(str::trim) {
            Some(note) if !note.is_empty() => note.to_string(),
            _ if line.product.is_some() => format!("Loan of {}", name),
            _ => String::new(),
        };

        items.push(NewLoanItem {
            name,
            product_id: line.product.map(|p| p.id),
            quantity_borrowed: line.quantity,
            detail_note,
        });
    }

    for (product, total) in per_product.values() {
        if Decimal::from(*total) > product.quantity {
            return Err(LoanRuleError::InsufficientStock {
                name: product.name.clone(),
                available: product.quantity,
            });
        }
    }

    Ok(NewLoan {
        worker_id: worker.id,
        status: LoanStatus::Pending,
        notes: notes.filter(|n| !n.trim().is_empty()),
        items,
    })
}
