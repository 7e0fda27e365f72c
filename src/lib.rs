//! Stockroom warehouse tool loan server
//!
//! A REST JSON gateway in front of the inventory backend: workers borrow
//! tools from stock, return them in one or more partial events, and the
//! loan's status is derived from those returns and its age.

use std::sync::Arc;

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers.
/// Configuration is consumed at startup when the services are built.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
