//! Worker browsing

use std::sync::Arc;

use crate::{
    backend::InventoryBackend,
    error::AppResult,
    models::{Page, PageRequest, Worker, WorkerFilter},
};

#[derive(Clone)]
pub struct WorkersService {
    backend: Arc<dyn InventoryBackend>,
    per_page: u32,
}

impl WorkersService {
    pub fn new(backend: Arc<dyn InventoryBackend>, per_page: u32) -> Self {
        Self { backend, per_page }
    }

    pub fn page_request(&self, page: Option<u32>, per_page: Option<u32>) -> PageRequest {
        PageRequest::new(page, per_page, self.per_page)
    }

    pub async fn list(&self, filter: &WorkerFilter, page: PageRequest) -> AppResult<Page<Worker>> {
        // Only ask for active workers unless inactive ones are wanted too
        let active = (!filter.include_inactive).then_some(true);
        let workers = self.backend.list_workers(active).await?;

        let matching: Vec<Worker> = workers.into_iter().filter(|w| filter.matches(w)).collect();
        Ok(page.paginate(matching))
    }

    /// Cheapest backend round trip, used by the readiness check
    pub async fn probe(&self) -> AppResult<()> {
        self.backend.list_workers(Some(true)).await?;
        Ok(())
    }
}
