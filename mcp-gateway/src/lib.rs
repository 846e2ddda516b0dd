pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::{BackendClient, Gateway};
use std::sync::Arc;

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(backend_client: Arc<BackendClient>) -> Self {
        Self {
            gateway: Arc::new(Gateway::new(backend_client)),
        }
    }
}
