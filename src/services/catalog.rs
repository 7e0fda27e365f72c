//! Product catalog and inventory dashboard

use std::sync::Arc;

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::{
    backend::InventoryBackend,
    config::CatalogConfig,
    error::AppResult,
    models::{
        product::{InventoryDashboard, QuantityEntry},
        Page, PageRequest, Product, ProductFilter, ProductSearch,
    },
};

const TOP_ENTRIES: usize = 5;

#[derive(Clone)]
pub struct CatalogService {
    backend: Arc<dyn InventoryBackend>,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(backend: Arc<dyn InventoryBackend>, config: CatalogConfig) -> Self {
        Self { backend, config }
    }

    pub fn page_request(&self, page: Option<u32>, per_page: Option<u32>) -> PageRequest {
        PageRequest::new(page, per_page, self.config.products_per_page)
    }

    /// Search products on the backend, then apply the local-only criteria
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> AppResult<Page<Product>> {
        let products = self.backend.list_products(&filter.search).await?;
        let matching: Vec<Product> = products
            .into_iter()
            .filter(|p| filter.matches_locally(p))
            .collect();

        Ok(page.paginate(matching))
    }

    /// Stock alerts and rankings over the whole catalog.
    /// `search` only narrows the alert list.
    pub async fn dashboard(&self, search: Option<&str>) -> AppResult<InventoryDashboard> {
        let products = self.backend.list_products(&ProductSearch::default()).await?;
        let threshold = Decimal::from(self.config.low_stock_threshold);

        Ok(summarize_inventory(products, search, threshold))
    }
}

/// Build the dashboard from a product list
pub fn summarize_inventory(
    products: Vec<Product>,
    search: Option<&str>,
    default_threshold: Decimal,
) -> InventoryDashboard {
    let search = search.map(str::trim).filter(|s| !s.is_empty());
    let total_quantity: Decimal = products.iter().map(|p| p.quantity).sum();

    let mut alerts: Vec<Product> = products
        .iter()
        .filter(|p| p.quantity <= p.alert_threshold(default_threshold))
        .filter(|p| search.map_or(true, |term| p.matches_text(term)))
        .cloned()
        .collect();
    alerts.sort_by(|a, b| a.quantity.cmp(&b.quantity).then_with(|| a.name.cmp(&b.name)));

    let critical_count = alerts
        .iter()
        .filter(|p| p.quantity < p.alert_threshold(default_threshold) / Decimal::TWO)
        .count();

    let mut by_classification: IndexMap<&str, Decimal> = IndexMap::new();
    for product in &products {
        *by_classification
            .entry(product.classification.as_str())
            .or_insert(Decimal::ZERO) += product.quantity;
    }
    let mut top_classifications: Vec<QuantityEntry> = by_classification
        .into_iter()
        .map(|(name, quantity)| QuantityEntry {
            name: name.to_string(),
            quantity,
        })
        .collect();
    // stable sort keeps first-seen order on ties
    top_classifications.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    top_classifications.truncate(TOP_ENTRIES);

    let mut top_products: Vec<QuantityEntry> = products
        .iter()
        .map(|p| QuantityEntry {
            name: p.name.clone(),
            quantity: p.quantity,
        })
        .collect();
    top_products.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    top_products.truncate(TOP_ENTRIES);

    InventoryDashboard {
        total_products: products.len(),
        total_quantity,
        alert_count: alerts.len(),
        critical_count,
        low_stock_count: alerts.len() - critical_count,
        alerts,
        top_classifications,
        top_products,
    }
}
