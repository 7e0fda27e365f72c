//! Product (stock) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::text::contains_folded;

/// Product held in the warehouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    /// Unique product code
    pub code: String,
    pub name: String,
    /// On-hand stock, never negative
    #[schema(value_type = f64)]
    pub quantity: Decimal,
    pub unit_of_measure: String,
    pub classification: String,
    pub subclassification: Option<String>,
    pub shelf_location: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub minimum_quantity: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub maximum_quantity: Option<Decimal>,
    pub notes: Option<String>,
    pub registered_at: Option<DateTime<Utc>>,
}

/// Product query parameters
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
pub struct ProductQuery {
    /// Search in code or name (forwarded to the backend)
    pub search: Option<String>,
    /// Exact classification (forwarded to the backend)
    pub classification: Option<String>,
    /// Exact unit of measure
    pub unit_of_measure: Option<String>,
    /// Minimum on-hand quantity
    pub min_quantity: Option<Decimal>,
    /// Maximum on-hand quantity
    pub max_quantity: Option<Decimal>,
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub per_page: Option<u32>,
}

/// Filters the backend understands natively
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductSearch {
    pub search: Option<String>,
    pub classification: Option<String>,
}

/// Full product filter; the backend applies the `search` part and the
/// remaining criteria are checked locally
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub search: ProductSearch,
    pub unit_of_measure: Option<String>,
    pub min_quantity: Option<Decimal>,
    pub max_quantity: Option<Decimal>,
}

impl ProductFilter {
    /// Criteria the backend does not support
    pub fn matches_locally(&self, product: &Product) -> bool {
        if let Some(unit) = non_empty(&self.unit_of_measure) {
            if product.unit_of_measure != unit {
                return false;
            }
        }
        if let Some(min) = self.min_quantity {
            if product.quantity < min {
                return false;
            }
        }
        if let Some(max) = self.max_quantity {
            if product.quantity > max {
                return false;
            }
        }
        true
    }
}

impl From<&ProductQuery> for ProductFilter {
    fn from(query: &ProductQuery) -> Self {
        Self {
            search: ProductSearch {
                search: non_empty(&query.search).map(str::to_string),
                classification: non_empty(&query.classification).map(str::to_string),
            },
            unit_of_measure: non_empty(&query.unit_of_measure).map(str::to_string),
            min_quantity: query.min_quantity,
            max_quantity: query.max_quantity,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Product {
    /// Alert threshold: the product's own minimum, or the configured default
    pub fn alert_threshold(&self, default_threshold: Decimal) -> Decimal {
        self.minimum_quantity.unwrap_or(default_threshold)
    }

    pub fn matches_text(&self, term: &str) -> bool {
        contains_folded(&self.name, term) || contains_folded(&self.code, term)
    }
}

/// Named quantity used by dashboard rankings
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct QuantityEntry {
    pub name: String,
    #[schema(value_type = f64)]
    pub quantity: Decimal,
}

/// Inventory summary derived from the product list
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InventoryDashboard {
    pub total_products: usize,
    #[schema(value_type = f64)]
    pub total_quantity: Decimal,
    /// Products at or below their alert threshold
    pub alert_count: usize,
    /// Products below half their alert threshold
    pub critical_count: usize,
    pub low_stock_count: usize,
    pub alerts: Vec<Product>,
    /// Top five classifications by total quantity
    pub top_classifications: Vec<QuantityEntry>,
    /// Top five products by quantity
    pub top_products: Vec<QuantityEntry>,
}
