//! Worker model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::text::contains_folded;

/// Worker allowed to borrow tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Worker {
    pub id: i32,
    /// Unique worker code
    pub code: String,
    pub name: String,
    pub active: bool,
    pub registered_at: Option<DateTime<Utc>>,
}

/// Worker query parameters
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
pub struct WorkerQuery {
    /// Search in name or code
    pub search: Option<String>,
    /// Include inactive workers (default: false)
    pub include_inactive: Option<bool>,
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub per_page: Option<u32>,
}

/// Filter applied to a fetched worker list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerFilter {
    pub search: Option<String>,
    pub include_inactive: bool,
}

impl WorkerFilter {
    pub fn matches(&self, worker: &Worker) -> bool {
        if !self.include_inactive && !worker.active {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                contains_folded(&worker.name, term) || contains_folded(&worker.code, term)
            }
            _ => true,
        }
    }
}

impl From<&WorkerQuery> for WorkerFilter {
    fn from(query: &WorkerQuery) -> Self {
        Self {
            search: query.search.clone(),
            include_inactive: query.include_inactive.unwrap_or(false),
        }
    }
}
