//! Business logic services

pub mod catalog;
pub mod loans;
pub mod reports;
pub mod workers;

use std::sync::Arc;

use crate::{backend::InventoryBackend, config::CatalogConfig};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub reports: reports::ReportsService,
    pub workers: workers::WorkersService,
}

impl Services {
    /// Create all services on top of the given backend
    pub fn new(backend: Arc<dyn InventoryBackend>, catalog_config: CatalogConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(backend.clone(), catalog_config.clone()),
            loans: loans::LoansService::new(backend.clone(), catalog_config.loans_per_page),
            reports: reports::ReportsService::new(backend.clone()),
            workers: workers::WorkersService::new(backend, catalog_config.workers_per_page),
        }
    }
}
